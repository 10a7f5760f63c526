#![no_main]

use libfuzzer_sys::fuzz_target;
use cppmatch::config::MatchConfig;
use cppmatch::lexer;
use cppmatch::matcher::merge;
use cppmatch::pipeline::{number_files, parse_all};
use cppmatch::preprocessor;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        let lexed = lexer::lex(s);
        let _ = preprocessor::scan(&lexed.tokens);

        // Use the input as both a header and a source so the matcher sees both roles.
        let files = number_files([("fuzz.h", s), ("fuzz.cpp", s)]);
        let config = MatchConfig::default();
        let sets = parse_all(&files, &config);
        let _ = merge(&sets, &config);
    }
});
