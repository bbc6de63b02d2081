//! Exposed port detection for rendered compositions.
//!
//! This is a text heuristic, not a compose parser: it only knows the host
//! ports used by catalog software and misses anything else.

/// Known host ports, checked in this order. More specific ports come before
/// `80` so a composition publishing both reports the application port.
pub const KNOWN_PORTS: &[u16] = &[
    2368, // ghost
    3000, // gitea
    3001, // uptime-kuma
    5678, // n8n
    8000, // plausible
    8065, // mattermost
    8080, // nextcloud, vaultwarden
    8096, // jellyfin
    80,   // wordpress, nginx
];

/// First known port published as `"<port>:` or `'<port>:` in `text`, or 0.
pub fn detect_port(text: &str) -> u16 {
    KNOWN_PORTS
        .iter()
        .copied()
        .find(|port| {
            text.contains(&format!("\"{port}:")) || text.contains(&format!("'{port}:"))
        })
        .unwrap_or(0)
}
