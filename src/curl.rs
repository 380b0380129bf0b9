use crate::builder::RequestSpec;
use crate::models::HttpMethod;

/// Format a resolved request as a cURL command (display only)
pub fn to_curl(spec: &RequestSpec) -> String {
    let mut parts = vec!["curl".to_string()];

    // Method (HEAD maps to -I)
    match spec.method {
        HttpMethod::GET => {}
        HttpMethod::HEAD => parts.push("-I".to_string()),
        method => parts.push(format!("-X {}", method.as_str())),
    }

    // URL
    parts.push(quote(&spec.url));

    // Headers
    for (key, value) in &spec.headers {
        parts.push(format!("-H {}", quote(&format!("{}: {}", key, value))));
    }

    // Auth
    if let Some(creds) = &spec.basic_auth {
        parts.push(format!(
            "-u {}",
            quote(&format!("{}:{}", creds.username, creds.password))
        ));
    }

    // Body
    if let Some(body) = &spec.body {
        parts.push(format!("-d {}", quote(body)));
    }

    parts.push(format!("--max-time {}", format_secs(spec.timeout.as_secs_f64())));

    if !spec.verify_ssl {
        parts.push("-k".to_string());
    }

    parts.join(" \\\n  ")
}

/// Single-quote for a POSIX shell
fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

fn format_secs(secs: f64) -> String {
    if secs.fract() == 0.0 {
        format!("{}", secs as u64)
    } else {
        format!("{:.3}", secs)
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}
