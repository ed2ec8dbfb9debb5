//! Summary extraction from `ping` output.
//!
//! Only two lines are looked at: the one mentioning "packet loss" and the
//! one carrying "min/avg/max". Anything unexpected leaves the field empty.

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PingSummary {
    pub packet_loss: Option<String>,
    pub min_rtt_ms: Option<f64>,
    pub avg_rtt_ms: Option<f64>,
    pub max_rtt_ms: Option<f64>,
}

/// Pull packet loss and round-trip times out of raw `ping` output.
///
/// When a marker appears on several lines the last one wins.
pub fn summarize(output: &str) -> PingSummary {
    let mut summary = PingSummary::default();

    for line in output.lines() {
        if line.contains("packet loss") {
            if let Some(loss) = packet_loss(line) {
                summary.packet_loss = Some(loss);
            }
        }
        if line.contains("min/avg/max") {
            if let Some((min, avg, max)) = round_trip(line) {
                summary.min_rtt_ms = Some(min);
                summary.avg_rtt_ms = Some(avg);
                summary.max_rtt_ms = Some(max);
            }
        }
    }

    summary
}

// "4 packets transmitted, 4 received, 0% packet loss, time 3004ms" → "0%"
fn packet_loss(line: &str) -> Option<String> {
    let (before, _) = line.split_once('%')?;
    let value = before.split_whitespace().last()?;
    Some(format!("{}%", value))
}

// "rtt min/avg/max/mdev = 0.045/0.061/0.080/0.013 ms" → (0.045, 0.061, 0.080)
fn round_trip(line: &str) -> Option<(f64, f64, f64)> {
    let stats = line.split('=').nth(1)?.trim().split(' ').next()?;
    let mut parts = stats.split('/');
    let min = parts.next()?.parse().ok()?;
    let avg = parts.next()?.parse().ok()?;
    let max = parts.next()?.parse().ok()?;
    Some((min, avg, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINUX: &str = "\
PING 192.168.56.1 (192.168.56.1) 56(84) bytes of data.
64 bytes from 192.168.56.1: icmp_seq=1 ttl=64 time=0.045 ms

--- 192.168.56.1 ping statistics ---
4 packets transmitted, 4 received, 0% packet loss, time 3004ms
rtt min/avg/max/mdev = 0.045/0.061/0.080/0.013 ms
";

    const MACOS: &str = "\
--- example.com ping statistics ---
4 packets transmitted, 3 packets received, 25.0% packet loss
round-trip min/avg/max/stddev = 14.123/15.200/16.300/0.900 ms
";

    #[test]
    fn test_linux_output() {
        let s = summarize(LINUX);
        assert_eq!(s.packet_loss.as_deref(), Some("0%"));
        assert_eq!(s.min_rtt_ms, Some(0.045));
        assert_eq!(s.avg_rtt_ms, Some(0.061));
        assert_eq!(s.max_rtt_ms, Some(0.080));
    }

    #[test]
    fn test_macos_output() {
        let s = summarize(MACOS);
        assert_eq!(s.packet_loss.as_deref(), Some("25.0%"));
        assert_eq!(s.avg_rtt_ms, Some(15.2));
    }

    #[test]
    fn test_unreachable_host_has_no_rtt() {
        let s = summarize("2 packets transmitted, 0 received, 100% packet loss, time 1010ms\n");
        assert_eq!(s.packet_loss.as_deref(), Some("100%"));
        assert_eq!(s.min_rtt_ms, None);
    }

    #[test]
    fn test_garbage_is_empty() {
        assert_eq!(summarize("ping: unknown host\nmin/avg/max = n/a\n"), PingSummary::default());
    }
}
