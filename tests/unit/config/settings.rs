use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
    let map: HashMap<String, OsString> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), OsString::from(v)))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn empty_environment_yields_defaults() {
    let settings = Settings::from_lookup(lookup_from(&[]));
    assert_eq!(settings, Settings::default());
}

#[test]
fn font_file_and_dirs_are_read() {
    let dirs = std::env::join_paths(["/a/fonts", "/b/fonts"]).unwrap();
    let dirs = dirs.to_str().unwrap().to_string();
    let settings = Settings::from_lookup(lookup_from(&[
        (ENV_FONT, "/x/Bold.ttf"),
        (ENV_FONT_DIRS, dirs.as_str()),
    ]));
    assert_eq!(settings.font_file, Some(PathBuf::from("/x/Bold.ttf")));
    assert_eq!(
        settings.font_dirs,
        vec![PathBuf::from("/a/fonts"), PathBuf::from("/b/fonts")]
    );
}

#[test]
fn empty_values_are_ignored() {
    let settings = Settings::from_lookup(lookup_from(&[(ENV_FONT, ""), (ENV_FONT_DIRS, "")]));
    assert_eq!(settings.font_file, None);
    assert!(settings.font_dirs.is_empty());
}

#[test]
fn explicit_font_overrides_environment() {
    let settings = Settings::from_lookup(lookup_from(&[(ENV_FONT, "/env.ttf")]));
    let settings = settings.with_font_file(Some(PathBuf::from("/flag.ttf")));
    assert_eq!(settings.font_file, Some(PathBuf::from("/flag.ttf")));
    let settings = settings.with_font_file(None);
    assert_eq!(settings.font_file, Some(PathBuf::from("/flag.ttf")));
}
