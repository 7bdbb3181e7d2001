use std::net::Ipv4Addr;

use crate::error::CurlError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Flag {
    Method,
    Header,
    Data,
    DataUrlencode,
    Form,
    FormString,
    User,
    UserAgent,
    Referer,
    Cookie,
    Url,
    Head,
    Get,
    /// A value-taking flag whose value is consumed and dropped.
    Skip,
}

impl Flag {
    pub(super) const fn takes_value(self) -> bool {
        !matches!(self, Flag::Head | Flag::Get)
    }
}

/// Flags curl accepts with a value that have no counterpart in a request
/// description. Listed so their values are never taken for the URL.
const SKIPPED_WITH_VALUE: &[&str] = &[
    "-o",
    "--output",
    "-m",
    "--max-time",
    "--connect-timeout",
    "-x",
    "--proxy",
    "-U",
    "--proxy-user",
    "--proxy-header",
    "-w",
    "--write-out",
    "--cacert",
    "--capath",
    "-E",
    "--cert",
    "--key",
    "-T",
    "--upload-file",
    "--retry",
    "--retry-delay",
    "--retry-max-time",
    "-r",
    "--range",
    "--resolve",
    "--connect-to",
    "-c",
    "--cookie-jar",
    "-K",
    "--config",
    "--limit-rate",
    "--max-redirs",
    "--interface",
    "-z",
    "--time-cond",
    "-D",
    "--dump-header",
    "--trace",
    "--trace-ascii",
];

pub(super) fn lookup(name: &str) -> Option<Flag> {
    let flag = match name {
        "-X" | "--request" => Flag::Method,
        "-H" | "--header" => Flag::Header,
        "-d" | "--data" | "--data-raw" | "--data-binary" | "--data-ascii" => Flag::Data,
        "--data-urlencode" => Flag::DataUrlencode,
        "-F" | "--form" => Flag::Form,
        "--form-string" => Flag::FormString,
        "-u" | "--user" => Flag::User,
        "-A" | "--user-agent" => Flag::UserAgent,
        "-e" | "--referer" => Flag::Referer,
        "-b" | "--cookie" => Flag::Cookie,
        "--url" => Flag::Url,
        "-I" | "--head" => Flag::Head,
        "-G" | "--get" => Flag::Get,
        other if SKIPPED_WITH_VALUE.contains(&other) => Flag::Skip,
        _ => return None,
    };
    Some(flag)
}

/// A command-line token classified as flag or bare word.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum Token<'src> {
    /// A flag name plus a value written in the same token (`-XPOST`,
    /// `--data=x`).
    Flag {
        name: &'src str,
        inline: Option<&'src str>,
    },
    Bare(&'src str),
}

pub(super) fn classify(token: &str) -> Token<'_> {
    if let Some(long) = token.strip_prefix("--")
        && !long.is_empty()
    {
        return match token.split_once('=') {
            Some((name, value)) => Token::Flag {
                name,
                inline: Some(value),
            },
            None => Token::Flag {
                name: token,
                inline: None,
            },
        };
    }
    if token.starts_with('-') && token.len() > 1 {
        let split = token
            .char_indices()
            .nth(2)
            .map_or(token.len(), |(idx, _)| idx);
        let (name, rest) = token.split_at(split);
        return Token::Flag {
            name,
            inline: (!rest.is_empty()).then_some(rest),
        };
    }
    Token::Bare(token)
}

/// Splits curl text into shell words, joining backslash line continuations.
///
/// # Errors
///
/// Returns an error when quoting is unbalanced.
pub(super) fn tokenize(text: &str) -> Result<Vec<String>, CurlError> {
    let joined = text.replace("\\\r\n", " ").replace("\\\n", " ");
    shlex::split(&joined).ok_or(CurlError::Tokenize)
}

pub(super) fn looks_like_url(token: &str) -> bool {
    if token.is_empty() || token.chars().any(char::is_whitespace) {
        return false;
    }
    if token.contains("://") || token.starts_with("www.") || token.starts_with("localhost") {
        return true;
    }
    if is_ipv4_authority(token) {
        return true;
    }
    token.contains('.')
        && token
            .chars()
            .next()
            .is_some_and(|first| first.is_ascii_alphanumeric())
        && (token.chars().any(|ch| ch.is_ascii_alphabetic()) || token.contains([':', '/']))
}

/// `10.0.0.1`, `10.0.0.1:8080` or either followed by a path or query.
fn is_ipv4_authority(token: &str) -> bool {
    let authority = token
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let host = match authority.rsplit_once(':') {
        Some((host, port)) if port.parse::<u16>().is_ok() => host,
        Some(_) => return false,
        None => authority,
    };
    host.parse::<Ipv4Addr>().is_ok()
}
