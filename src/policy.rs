//! The runtime TLS-bypass fallback contract.
//!
//! When the bundle in the image is absent or wrong, the container
//! environment falls back to disabling verification outright. The
//! variables live in the compose file, not here; this module is the
//! single written-down copy of that contract so the CLI can print it and
//! tests can pin it.

use std::fmt::Write;

/// One variable in the fallback policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyVar {
    /// Environment variable name.
    pub name: &'static str,
    /// The value that disables verification.
    pub value: &'static str,
    /// Which tool inside the container consumes it.
    pub consumer: &'static str,
}

/// The fallback variables, in the order the compose file lists them.
///
/// Installing the real root certificate makes all of these unnecessary;
/// they exist so the container still functions on day one behind an
/// interception proxy.
pub const TLS_BYPASS_ENV: &[PolicyVar] = &[
    PolicyVar {
        name: "OLLAMA_INSECURE",
        value: "true",
        consumer: "serving daemon, for registry pulls",
    },
    PolicyVar {
        name: "CURL_CA_BUNDLE",
        value: "",
        consumer: "curl, an empty bundle path disables verification",
    },
    PolicyVar {
        name: "GIT_SSL_NO_VERIFY",
        value: "true",
        consumer: "git, for clones during image setup",
    },
    PolicyVar {
        name: "PYTHONHTTPSVERIFY",
        value: "0",
        consumer: "python HTTP clients",
    },
];

/// Renders the policy as `KEY=VALUE` lines for a dotenv or compose
/// `environment:` block.
pub fn render_dotenv() -> String {
    let mut out = String::new();
    for var in TLS_BYPASS_ENV {
        // A write! to a String cannot fail.
        let _ = writeln!(out, "{}={}", var.name, var.value);
    }
    out
}
