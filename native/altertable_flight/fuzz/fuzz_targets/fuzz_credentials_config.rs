#![no_main]
//! Fuzz test for credential parsing
//!
//! The host hands over arbitrary configuration mappings. Parsing must reject
//! bad input with an error and never panic; accepted input must yield a
//! well-formed transport URI.

use altertable_flight::Credentials;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(config) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };

    if let Ok(credentials) = Credentials::from_config(&config) {
        let uri = credentials.uri();
        assert!(uri.starts_with("grpc://") || uri.starts_with("grpc+tls://"));

        let target = credentials.build_target();
        assert_eq!(target.uri(), uri);
        assert_eq!(target.auth_options().len(), 2);
    }
});
