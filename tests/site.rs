#![cfg(not(target_arch = "wasm32"))]

use std::fs;
use std::path::Path;

#[test]
fn page_scripts_are_shipped_with_the_site() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("static");
    let page = fs::read_to_string(root.join("index.html")).expect("index.html readable");

    let scripts: Vec<&str> = page
        .split("<script src=\"")
        .skip(1)
        .filter_map(|rest| rest.split('"').next())
        .collect();
    assert_eq!(scripts, vec!["./fxhash.min.js"]);
    for script in scripts {
        assert!(root.join(script).is_file(), "{script} missing from static/");
    }

    let snippet = fs::read_to_string(root.join("fxhash.min.js")).expect("snippet readable");
    for member in ["rand", "params(", "getParams(", "features(", "on("] {
        assert!(snippet.contains(member), "$fx stand-in lacks {member}");
    }
}
