//! Headless launch-argument injection.
//!
//! Each supported browser family registers an injector that knows its own
//! option path and flag string, so adding a browser means adding a registry
//! entry rather than growing a central conditional.

use serde_json::{Map, Value, json};

use crate::capabilities::{BrowserFamily, Capabilities};

/// Mutates a desired capability set to request a headless launch.
type Injector = fn(&mut Capabilities);

/// Returns the headless injector for a browser family, if one exists.
fn injector(family: BrowserFamily) -> Option<Injector> {
    match family {
        BrowserFamily::Firefox => Some(inject_firefox),
        BrowserFamily::Chrome => Some(inject_chrome),
        BrowserFamily::Other => None,
    }
}

/// Applies headless mode to the desired capability set.
///
/// Returns true when an injector ran and mutated the set. No-op (and
/// false) when `requested` is false. Families without a registered
/// injector are silently ignored (traced at debug level); an unsupported
/// browser is not an error. Injection is append-only: applying twice
/// appends the flag twice. Launch args are never deduplicated here.
pub fn apply_headless(caps: &mut Capabilities, family: BrowserFamily, requested: bool) -> bool {
    if !requested {
        return false;
    }

    match injector(family) {
        Some(inject) => {
            inject(caps);
            true
        }
        None => {
            tracing::debug!(?family, "no headless injector for browser family; ignoring");
            false
        }
    }
}

/// Firefox takes `-headless` under `alwaysMatch."moz:firefoxOptions".args`.
fn inject_firefox(caps: &mut Capabilities) {
    let always_match = ensure_object(caps.as_map_mut(), "alwaysMatch");
    let opts = ensure_object(always_match, "moz:firefoxOptions");
    append_arg(opts, "-headless");
}

/// Chrome takes `--headless` under top-level `chromeOptions.args`.
fn inject_chrome(caps: &mut Capabilities) {
    let opts = ensure_object(caps.as_map_mut(), "chromeOptions");
    append_arg(opts, "--headless");
}

/// Returns the object at `key`, inserting an empty one if absent or if the
/// existing value is not an object.
fn ensure_object<'a>(map: &'a mut Map<String, Value>, key: &str) -> &'a mut Map<String, Value> {
    if !map.get(key).is_some_and(Value::is_object) {
        map.insert(key.to_string(), json!({}));
    }
    map.get_mut(key)
        .and_then(Value::as_object_mut)
        .unwrap_or_else(|| unreachable!("object inserted above"))
}

/// Appends `arg` to the block's `args` list, creating the list if absent.
/// Existing entries are never replaced.
fn append_arg(opts: &mut Map<String, Value>, arg: &str) {
    match opts.get_mut("args").and_then(Value::as_array_mut) {
        Some(args) => args.push(json!(arg)),
        None => {
            opts.insert("args".to_string(), json!([arg]));
        }
    }
}
