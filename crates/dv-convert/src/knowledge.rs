//! SIP protocol reference tables.
//!
//! Read-only data consulted by the classifiers: request methods, response
//! codes with their reason phrases, well-known call-flow shapes, common
//! headers and SDP attribute keywords. Built once, shared process-wide.

use std::sync::LazyLock;

static SHARED: LazyLock<SipKnowledge> = LazyLock::new(SipKnowledge::new);

/// Static SIP reference data.
#[derive(Debug)]
pub struct SipKnowledge {
    pub request_methods: &'static [&'static str],
    /// `(code, reason phrase)` pairs in numeric order.
    pub response_codes: &'static [(&'static str, &'static str)],
    /// Named message sequences of well-known call flows.
    pub call_flow_patterns: &'static [(&'static str, &'static [&'static str])],
    pub headers: &'static [&'static str],
    pub sdp_attributes: &'static [&'static str],
}

impl SipKnowledge {
    fn new() -> Self {
        Self {
            request_methods: &[
                "INVITE",
                "ACK",
                "BYE",
                "CANCEL",
                "REGISTER",
                "OPTIONS",
                "PRACK",
                "SUBSCRIBE",
                "NOTIFY",
                "PUBLISH",
                "INFO",
                "REFER",
                "MESSAGE",
                "UPDATE",
            ],
            response_codes: &[
                ("100", "Trying"),
                ("180", "Ringing"),
                ("181", "Call Is Being Forwarded"),
                ("182", "Queued"),
                ("183", "Session Progress"),
                ("200", "OK"),
                ("202", "Accepted"),
                ("300", "Multiple Choices"),
                ("301", "Moved Permanently"),
                ("302", "Moved Temporarily"),
                ("400", "Bad Request"),
                ("401", "Unauthorized"),
                ("403", "Forbidden"),
                ("404", "Not Found"),
                ("408", "Request Timeout"),
                ("486", "Busy Here"),
                ("487", "Request Terminated"),
                ("500", "Server Internal Error"),
                ("503", "Service Unavailable"),
                ("600", "Busy Everywhere"),
                ("603", "Decline"),
                ("604", "Does Not Exist Anywhere"),
            ],
            call_flow_patterns: &[
                (
                    "basic_call",
                    &["INVITE", "100 Trying", "180 Ringing", "200 OK", "ACK", "BYE", "200 OK"],
                ),
                (
                    "with_prack",
                    &[
                        "INVITE",
                        "100 Trying",
                        "183 Session Progress",
                        "PRACK",
                        "200 OK",
                        "180 Ringing",
                        "PRACK",
                        "200 OK",
                        "200 OK",
                        "ACK",
                    ],
                ),
                (
                    "cancel",
                    &["INVITE", "100 Trying", "CANCEL", "200 OK", "487 Request Terminated", "ACK"],
                ),
                ("busy", &["INVITE", "100 Trying", "486 Busy Here", "ACK"]),
                ("declined", &["INVITE", "100 Trying", "603 Decline", "ACK"]),
            ],
            headers: &[
                "Via",
                "From",
                "To",
                "Call-ID",
                "CSeq",
                "Contact",
                "Max-Forwards",
                "Content-Type",
                "Content-Length",
                "User-Agent",
                "Allow",
                "Supported",
            ],
            sdp_attributes: &["RTP", "SRTP", "RTCP", "codec", "sendrecv", "recvonly", "sendonly"],
        }
    }

    /// Process-wide shared instance.
    pub fn shared() -> &'static Self {
        &SHARED
    }

    /// First request method appearing in the text (matched case-insensitively).
    pub fn find_method(&self, text: &str) -> Option<&'static str> {
        let upper = text.to_uppercase();
        self.request_methods.iter().find(|m| upper.contains(**m)).copied()
    }

    /// First `(code, reason)` pair matching the text.
    ///
    /// A full `"code reason"` string matches anywhere; a bare code matches
    /// only within the first `code_prefix` characters, where the status
    /// column of a ladder diagram sits.
    pub fn find_response(&self, text: &str, code_prefix: usize) -> Option<(&'static str, &'static str)> {
        let prefix: String = text.chars().take(code_prefix).collect();
        self.response_codes
            .iter()
            .find(|(code, reason)| text.contains(&format!("{code} {reason}")) || prefix.contains(code))
            .copied()
    }

    /// First SDP attribute keyword appearing in the text.
    pub fn find_sdp_attribute(&self, text: &str) -> Option<&'static str> {
        self.sdp_attributes.iter().find(|a| text.contains(**a)).copied()
    }
}
