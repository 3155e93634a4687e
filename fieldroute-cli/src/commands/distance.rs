//! One-off geometric distance command.

use clap::Args;

use fieldroute::geo::{haversine_km, Coordinate, LegEfficiency};

use crate::error::CliError;

/// Arguments for `fieldroute distance`.
#[derive(Debug, Args)]
pub struct DistanceArgs {
    /// Origin as LAT,LON
    #[arg(long)]
    pub from: String,
    /// Destination as LAT,LON
    #[arg(long)]
    pub to: String,
}

/// Prints the straight-line distance between two coordinates.
pub fn run(args: DistanceArgs) -> Result<(), CliError> {
    let from = parse(&args.from)?;
    let to = parse(&args.to)?;

    let km = haversine_km(from, to);
    println!("{:.1} km [{}]", km, LegEfficiency::classify(km).label());
    Ok(())
}

fn parse(raw: &str) -> Result<Coordinate, CliError> {
    raw.parse()
        .map_err(|e| CliError::Coordinate(raw.to_string(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_lat_lon_pair() {
        let c = parse("48.1173,-1.6778").unwrap();
        assert_eq!(c, Coordinate::new(48.1173, -1.6778));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse("north"), Err(CliError::Coordinate(..))));
    }
}
