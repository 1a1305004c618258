use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use latstat_common::{read_measurements, LatStatError, Measurement, Result, SeriesKind};
use tracing::{debug, warn};

/// A measurement file and the column name it is reported under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedSource {
    pub name: String,
    pub path: PathBuf,
}

/// Split the histogram positionals `<kind> [<name> <file>]+`.
pub fn parse_positionals(args: &[String]) -> Result<(SeriesKind, Vec<NamedSource>)> {
    if args.len() < 2 || (args.len() - 1) % 2 != 0 {
        return Err(LatStatError::Usage(
            "expected <ttfb|ttc|delta> followed by one or more <name> <file> pairs".to_string(),
        ));
    }

    let kind = SeriesKind::from_name(&args[0]).ok_or_else(|| {
        LatStatError::Usage(format!(
            "unknown series kind {:?}, expected one of ttfb, ttc, delta",
            args[0]
        ))
    })?;

    let sources = args[1..]
        .chunks_exact(2)
        .map(|pair| NamedSource {
            name: pair[0].clone(),
            path: PathBuf::from(&pair[1]),
        })
        .collect();

    Ok((kind, sources))
}

/// Read a whole measurement file. The handle is closed before returning.
pub fn load_measurements(path: &Path) -> Result<Vec<Measurement>> {
    let file = File::open(path).map_err(|e| LatStatError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let measurements = read_measurements(BufReader::new(file)).map_err(|e| match e {
        LatStatError::Io { message, .. } => LatStatError::Io {
            path: path.display().to_string(),
            message,
        },
        other => LatStatError::InSource {
            path: path.display().to_string(),
            error: Box::new(other),
        },
    })?;

    debug!(path = %path.display(), count = measurements.len(), "loaded measurements");
    Ok(measurements)
}

/// Load every source, one file at a time, keyed by name.
///
/// A name given twice keeps the later file.
pub fn load_sources(sources: &[NamedSource]) -> Result<BTreeMap<String, Vec<Measurement>>> {
    let mut loaded = BTreeMap::new();
    for source in sources {
        let measurements = load_measurements(&source.path)?;
        if loaded.insert(source.name.clone(), measurements).is_some() {
            warn!(name = %source.name, path = %source.path.display(), "duplicate source name, earlier file replaced");
        }
    }
    Ok(loaded)
}
