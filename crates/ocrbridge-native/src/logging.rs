// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Log subscriber setup for hosts embedding the bridge.

use ocrbridge_core::BridgeConfig;
use tracing_subscriber::EnvFilter;

/// Install a `tracing` fmt subscriber.
///
/// The filter comes from `RUST_LOG` when set, otherwise from
/// `config.log_filter`. Returns `false` if a global subscriber was already
/// installed (by the host or an earlier call); that is not an error.
pub fn init(config: &BridgeConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(filter = %config.log_filter, "ocrbridge logging initialised");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_harmless() {
        let config = BridgeConfig::default();
        let _ = init(&config);
        assert!(!init(&config));
    }
}
