//! Oracle configuration from flags and environment.

use anyhow::{Context, Result, bail};
use tracing::info;

use fieldmap_oracle::{HttpOracle, MappingOracle, StaticOracle};

use crate::cli::OracleArgs;

/// Environment variable holding the oracle endpoint.
pub const ORACLE_URL_VAR: &str = "FIELDMAP_ORACLE_URL";
/// Environment variable holding the bearer token.
pub const ORACLE_TOKEN_VAR: &str = "FIELDMAP_ORACLE_TOKEN";

/// Builds the oracle for this invocation. Flags override environment;
/// without either, or with `--no-oracle`, unresolved columns simply stay
/// unmapped.
pub fn build_oracle(args: &OracleArgs) -> Result<Box<dyn MappingOracle>> {
    if args.no_oracle {
        info!("oracle disabled, resolving with the fixed table only");
        return Ok(Box::new(StaticOracle::empty()));
    }

    let url = args
        .oracle_url
        .clone()
        .or_else(|| std::env::var(ORACLE_URL_VAR).ok());
    let token = args
        .oracle_token
        .clone()
        .or_else(|| std::env::var(ORACLE_TOKEN_VAR).ok());

    match (url, token) {
        (Some(url), Some(token)) => {
            let oracle = HttpOracle::new(url, token)
                .context("failed to construct oracle HTTP client")?;
            Ok(Box::new(oracle))
        }
        (Some(_), None) => {
            bail!("oracle URL configured but no token; set {ORACLE_TOKEN_VAR} or --oracle-token")
        }
        (None, _) => {
            info!("no oracle configured, resolving with the fixed table only");
            Ok(Box::new(StaticOracle::empty()))
        }
    }
}
