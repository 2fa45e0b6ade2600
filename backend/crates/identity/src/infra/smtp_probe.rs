//! Mailbox Probes
//!
//! [`SmtpMailboxProbe`] resolves the domain's mail host (lowest-preference
//! MX, falling back to the domain's own address records) and asks it
//! whether it would accept the recipient: `HELO`, `MAIL FROM`, `RCPT TO`,
//! then `QUIT` without sending any message.
//!
//! [`FormatOnlyProbe`] accepts every address and is used when probing is
//! disabled.

use std::net::{IpAddr, SocketAddr};

use hickory_resolver::{
    TokioAsyncResolver,
    config::{ResolverConfig, ResolverOpts},
    error::{ResolveError, ResolveErrorKind},
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use crate::application::config::MailProbeConfig;
use crate::domain::repository::{MailboxProbe, MailboxStatus, ProbeError};
use crate::domain::value_object::email::Email;

pub struct SmtpMailboxProbe {
    resolver: TokioAsyncResolver,
    helo_domain: String,
    from_address: String,
    port: u16,
}

impl SmtpMailboxProbe {
    /// Probe using the system-independent default resolver configuration
    pub fn new(config: &MailProbeConfig) -> Self {
        let resolver = TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default());
        Self::with_resolver(resolver, config)
    }

    pub fn with_resolver(resolver: TokioAsyncResolver, config: &MailProbeConfig) -> Self {
        Self {
            resolver,
            helo_domain: config.helo_domain.clone(),
            from_address: config.from_address.clone(),
            port: config.smtp_port,
        }
    }

    /// Address of the host that receives mail for `domain`, `None` if there is none
    async fn mail_host(&self, domain: &str) -> Result<Option<IpAddr>, ProbeError> {
        match self.resolver.mx_lookup(domain).await {
            Ok(mx) => {
                let Some(best) = mx.iter().min_by_key(|r| r.preference()) else {
                    return self.first_ip(domain).await;
                };
                // Null MX: the domain explicitly accepts no mail
                if best.exchange().is_root() {
                    return Ok(None);
                }
                self.first_ip(&best.exchange().to_utf8()).await
            }
            Err(e) if is_no_records(&e) => self.first_ip(domain).await,
            Err(e) => Err(ProbeError::Unreachable(e.to_string())),
        }
    }

    async fn first_ip(&self, host: &str) -> Result<Option<IpAddr>, ProbeError> {
        match self.resolver.lookup_ip(host).await {
            Ok(ips) => Ok(ips.iter().next()),
            Err(e) if is_no_records(&e) => Ok(None),
            Err(e) => Err(ProbeError::Unreachable(e.to_string())),
        }
    }
}

impl MailboxProbe for SmtpMailboxProbe {
    async fn probe(&self, email: &Email) -> Result<MailboxStatus, ProbeError> {
        let Some(host) = self.mail_host(email.domain()).await? else {
            tracing::debug!(domain = email.domain(), "No mail host");
            return Ok(MailboxStatus::NoMailHost);
        };

        let addr = SocketAddr::new(host, self.port);
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| ProbeError::Unreachable(format!("{addr}: {e}")))?;

        let status =
            rcpt_dialogue(stream, &self.helo_domain, &self.from_address, email.as_str()).await?;
        tracing::debug!(domain = email.domain(), %addr, ?status, "Mailbox probed");
        Ok(status)
    }
}

fn is_no_records(e: &ResolveError) -> bool {
    matches!(e.kind(), ResolveErrorKind::NoRecordsFound { .. })
}

/// Run the recipient check on an open SMTP connection
async fn rcpt_dialogue<S>(
    stream: S,
    helo_domain: &str,
    from_address: &str,
    recipient: &str,
) -> Result<MailboxStatus, ProbeError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (read, mut write) = tokio::io::split(stream);
    let mut reader = BufReader::new(read);

    expect_code(read_reply(&mut reader).await?, 220, "greeting")?;

    send(&mut write, &format!("HELO {helo_domain}")).await?;
    expect_code(read_reply(&mut reader).await?, 250, "HELO")?;

    send(&mut write, &format!("MAIL FROM:<{from_address}>")).await?;
    expect_code(read_reply(&mut reader).await?, 250, "MAIL FROM")?;

    send(&mut write, &format!("RCPT TO:<{recipient}>")).await?;
    let code = read_reply(&mut reader).await?;

    // Best effort, the answer is already known
    let _ = send(&mut write, "QUIT").await;

    match code {
        250 | 251 => Ok(MailboxStatus::Deliverable),
        500..=599 => Ok(MailboxStatus::MailboxAbsent),
        other => Err(ProbeError::Unreachable(format!("RCPT TO answered {other}"))),
    }
}

fn expect_code(code: u16, wanted: u16, step: &str) -> Result<(), ProbeError> {
    if code == wanted {
        Ok(())
    } else {
        Err(ProbeError::Unreachable(format!("{step} answered {code}")))
    }
}

async fn send<W>(write: &mut W, command: &str) -> Result<(), ProbeError>
where
    W: AsyncWrite + Unpin,
{
    write
        .write_all(format!("{command}\r\n").as_bytes())
        .await
        .map_err(|e| ProbeError::Unreachable(e.to_string()))?;
    write
        .flush()
        .await
        .map_err(|e| ProbeError::Unreachable(e.to_string()))
}

/// Read one (possibly multi-line) reply and return its code
async fn read_reply<R>(reader: &mut R) -> Result<u16, ProbeError>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    loop {
        line.clear();
        let n = reader
            .read_line(&mut line)
            .await
            .map_err(|e| ProbeError::Unreachable(e.to_string()))?;
        if n == 0 {
            return Err(ProbeError::Unreachable("connection closed".into()));
        }

        let code = line
            .get(..3)
            .and_then(|c| c.parse::<u16>().ok())
            .ok_or_else(|| {
                ProbeError::Unreachable(format!("malformed reply: {}", line.trim_end()))
            })?;

        // "250-" continues, "250 " ends
        if line.as_bytes().get(3) != Some(&b'-') {
            return Ok(code);
        }
    }
}

/// Accepts every syntactically valid address without touching the network
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOnlyProbe;

impl MailboxProbe for FormatOnlyProbe {
    async fn probe(&self, _email: &Email) -> Result<MailboxStatus, ProbeError> {
        Ok(MailboxStatus::Deliverable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    /// Replay `replies` as the server and return the outcome plus
    /// everything the client sent
    async fn converse(replies: &str) -> (Result<MailboxStatus, ProbeError>, String) {
        let (client, server) = tokio::io::duplex(4096);
        let (mut server_read, mut server_write) = tokio::io::split(server);
        server_write.write_all(replies.as_bytes()).await.unwrap();
        // The client sees EOF once the scripted replies run out
        server_write.shutdown().await.unwrap();

        let status =
            rcpt_dialogue(client, "probe.test", "noreply@probe.test", "ana@example.com").await;

        let mut sent = String::new();
        server_read.read_to_string(&mut sent).await.unwrap();
        (status, sent)
    }

    #[tokio::test]
    async fn test_accepted_recipient() {
        let (status, sent) =
            converse("220 mx ready\r\n250 hello\r\n250 ok\r\n250 accepted\r\n").await;
        assert_eq!(status, Ok(MailboxStatus::Deliverable));
        assert_eq!(
            sent,
            "HELO probe.test\r\nMAIL FROM:<noreply@probe.test>\r\nRCPT TO:<ana@example.com>\r\nQUIT\r\n"
        );
    }

    #[tokio::test]
    async fn test_rejected_recipient() {
        let (status, _) =
            converse("220 mx ready\r\n250 hello\r\n250 ok\r\n550 no such user\r\n").await;
        assert_eq!(status, Ok(MailboxStatus::MailboxAbsent));
    }

    #[tokio::test]
    async fn test_deferred_recipient_is_unreachable() {
        let (status, _) =
            converse("220 mx ready\r\n250 hello\r\n250 ok\r\n451 try later\r\n").await;
        assert!(matches!(status, Err(ProbeError::Unreachable(_))));
    }

    #[tokio::test]
    async fn test_multiline_replies() {
        let (status, _) = converse(
            "220-mx.example.com\r\n220 ready\r\n250-hello\r\n250 size\r\n250 ok\r\n251 forwarded\r\n",
        )
        .await;
        assert_eq!(status, Ok(MailboxStatus::Deliverable));
    }

    #[tokio::test]
    async fn test_refused_greeting() {
        let (status, sent) = converse("554 go away\r\n").await;
        assert!(matches!(status, Err(ProbeError::Unreachable(_))));
        assert!(sent.is_empty());
    }

    #[tokio::test]
    async fn test_connection_closed_mid_dialogue() {
        let (status, _) = converse("220 mx ready\r\n").await;
        assert!(matches!(status, Err(ProbeError::Unreachable(_))));
    }

    #[tokio::test]
    async fn test_malformed_reply() {
        let mut reader = BufReader::new(&b"hello\r\n"[..]);
        assert!(read_reply(&mut reader).await.is_err());
    }

    #[tokio::test]
    async fn test_format_only_probe() {
        let email = Email::parse("ana@example.com").unwrap();
        assert_eq!(
            FormatOnlyProbe.probe(&email).await,
            Ok(MailboxStatus::Deliverable)
        );
    }
}
