// file: src/messages.rs
// version: 1.0.0
// guid: a91d5c02-4e7b-4f38-b6d1-20c8f3a7e954

//! Message catalog for user-facing text.
//!
//! Failure kinds carry a message key plus positional arguments; rendering is
//! a lookup in this table followed by `{0}`/`{1}` substitution. Keeping the
//! catalog in one place keeps wording out of the error types themselves.

/// Key → template table. Templates use positional `{n}` markers.
const MESSAGES: &[(&str, &str)] = &[
    ("object_exists", "{0} already exists"),
    ("no_such_entry", "no entry for client {0}"),
    ("no_such_table", "no DHCP network table for network {0}"),
    ("network_unresolved", "could not determine network: {0}"),
    (
        "network_not_named",
        "no network name given and no default network configured",
    ),
    (
        "hosts_not_managed",
        "hosts table is not managed under the current configuration; host entry left alone",
    ),
    ("unsupported_resource", "unsupported datastore resource: {0}"),
    ("bad_client_address", "client address {0} is not on network {1}"),
    ("nothing_to_modify", "no modification options were given"),
];

/// Render the template for `key` with positional arguments substituted.
///
/// An unknown key falls back to the key itself followed by its arguments,
/// so a missing catalog entry still produces a diagnosable line.
pub fn render<S: AsRef<str>>(key: &str, args: &[S]) -> String {
    match MESSAGES.iter().find(|(k, _)| *k == key) {
        Some((_, template)) => {
            let mut out = (*template).to_string();
            for (i, arg) in args.iter().enumerate() {
                out = out.replace(&format!("{{{i}}}"), arg.as_ref());
            }
            out
        }
        None => {
            let mut out = key.to_string();
            for arg in args {
                out.push(' ');
                out.push_str(arg.as_ref());
            }
            out
        }
    }
}

/// Render an argument-less message.
pub fn text(key: &str) -> String {
    render::<&str>(key, &[])
}
