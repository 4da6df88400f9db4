#![no_main]

use std::sync::LazyLock;

use libfuzzer_sys::fuzz_target;

use jsstrip::config::StripOptions;
use jsstrip::parse::{Dialect, parse_source};
use jsstrip::strip::Stripper;

static STRIPPER: LazyLock<Stripper> = LazyLock::new(|| {
    Stripper::new(StripOptions::default()).expect("default options compile")
});

fuzz_target!(|data: &[u8]| {
    let Ok(code) = std::str::from_utf8(data) else {
        return;
    };
    // Parse errors are an expected outcome; panics are not.
    if let Ok(Some(out)) = STRIPPER.transform(code, "fuzz.js") {
        assert!(
            parse_source(&out.code, Dialect::Javascript).is_ok(),
            "output no longer parses: {:?}",
            out.code
        );
    }
});
