//! Outgoing email over SMTP
//!
//! Each message carries a plain-text body and an HTML alternative. Addresses
//! synthesized from phone numbers are never delivered to.

use std::sync::Arc;

use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::Config;

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("email delivery is not configured")]
    NotConfigured,
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Rendered message ready to send
#[derive(Debug, Clone, PartialEq)]
pub struct EmailContent {
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Contact form submission relayed to the association inbox
#[derive(Debug, Clone)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
}

#[derive(Clone)]
pub struct Mailer {
    transport: Option<Arc<AsyncSmtpTransport<Tokio1Executor>>>,
    from: Mailbox,
    site_url: String,
}

impl Mailer {
    pub fn from_config(config: &Config) -> Result<Self, EmailError> {
        let from: Mailbox = config.smtp_from.parse()?;

        let transport = match &config.smtp {
            Some(smtp) => {
                // 465 is implicit TLS, everything else negotiates STARTTLS
                let builder = if smtp.port == 465 {
                    AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host)?
                } else {
                    AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)?
                };
                let mut builder = builder.port(smtp.port);
                if let (Some(user), Some(pass)) = (&smtp.username, &smtp.password) {
                    builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
                }
                tracing::info!(host = %smtp.host, port = smtp.port, "SMTP transport configured");
                Some(Arc::new(builder.build()))
            }
            None => {
                tracing::warn!("SMTP_HOST not set, outgoing email disabled");
                None
            }
        };

        Ok(Self {
            transport,
            from,
            site_url: config.site_url.clone(),
        })
    }

    /// Mailer that never sends (tests, local development without SMTP)
    pub fn disabled(from: Mailbox, site_url: impl Into<String>) -> Self {
        Self {
            transport: None,
            from,
            site_url: site_url.into(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    async fn send(
        &self,
        to: &str,
        reply_to: Option<&str>,
        content: EmailContent,
    ) -> Result<(), EmailError> {
        if shared::identity::is_synthetic_email(to) {
            tracing::debug!(to = to, "Skipping synthetic address");
            return Ok(());
        }
        let transport = self.transport.as_ref().ok_or(EmailError::NotConfigured)?;

        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(to.parse()?)
            .subject(content.subject);
        if let Some(reply_to) = reply_to {
            builder = builder.reply_to(reply_to.parse()?);
        }
        let message = builder.multipart(MultiPart::alternative_plain_html(
            content.text,
            content.html,
        ))?;

        transport.send(message).await?;
        Ok(())
    }

    pub async fn send_contact(&self, inbox: &str, msg: &ContactMessage) -> Result<(), EmailError> {
        self.send(inbox, Some(&msg.email), contact_email(msg)).await?;
        tracing::info!(to = inbox, from = %msg.email, "Contact message relayed");
        Ok(())
    }

    pub async fn send_welcome(
        &self,
        to: &str,
        name: &str,
        login: &str,
        password: &str,
    ) -> Result<(), EmailError> {
        self.send(to, None, welcome_email(name, login, password, &self.site_url))
            .await?;
        tracing::info!(to = to, "Welcome email sent");
        Ok(())
    }

    pub async fn send_password_reset_code(&self, to: &str, code: &str) -> Result<(), EmailError> {
        self.send(to, None, password_reset_email(code)).await?;
        tracing::info!(to = to, "Password reset code sent");
        Ok(())
    }
}

// ── Templates ──

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"pt-BR\"><body style=\"font-family:Arial,sans-serif;color:#1f2933\">\
         <h2 style=\"color:#0b5394\">{title}</h2>{body}\
         <p style=\"font-size:12px;color:#7b8794\">Associação de Maricultores</p></body></html>",
        title = escape_html(title),
    )
}

pub fn contact_email(msg: &ContactMessage) -> EmailContent {
    let subject = match msg.subject.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => format!("[Contato] {s}"),
        _ => format!("[Contato] Mensagem de {}", msg.name),
    };
    let phone = msg.phone.as_deref().unwrap_or("-");

    let text = format!(
        "Nome: {}\nE-mail: {}\nTelefone: {phone}\n\n{}",
        msg.name, msg.email, msg.message
    );
    let html = layout(
        "Nova mensagem pelo site",
        &format!(
            "<p><b>Nome:</b> {}<br><b>E-mail:</b> {}<br><b>Telefone:</b> {}</p><p>{}</p>",
            escape_html(&msg.name),
            escape_html(&msg.email),
            escape_html(phone),
            escape_html(&msg.message).replace('\n', "<br>"),
        ),
    );
    EmailContent {
        subject,
        text,
        html,
    }
}

pub fn welcome_email(name: &str, login: &str, password: &str, site_url: &str) -> EmailContent {
    let text = format!(
        "Olá, {name}!\n\n\
         Seu acesso à área do maricultor foi criado.\n\
         Login: {login}\n\
         Senha: {password}\n\n\
         Acesse {site_url}/login e troque a senha no primeiro acesso."
    );
    let html = layout(
        "Bem-vindo(a) à área do maricultor",
        &format!(
            "<p>Olá, {}!</p><p>Seu acesso foi criado.</p>\
             <p><b>Login:</b> {}<br><b>Senha:</b> {}</p>\
             <p><a href=\"{site_url}/login\">Acessar</a> e trocar a senha no primeiro acesso.</p>",
            escape_html(name),
            escape_html(login),
            escape_html(password),
        ),
    );
    EmailContent {
        subject: "Seu acesso à área do maricultor".to_string(),
        text,
        html,
    }
}

pub fn password_reset_email(code: &str) -> EmailContent {
    EmailContent {
        subject: "Código para redefinir sua senha".to_string(),
        text: format!(
            "Seu código para redefinir a senha é: {code}\n\
             Válido por 30 minutos. Se você não pediu, ignore este e-mail."
        ),
        html: layout(
            "Redefinição de senha",
            &format!(
                "<p>Seu código é:</p><p style=\"font-size:28px;letter-spacing:6px\"><b>{code}</b></p>\
                 <p>Válido por 30 minutos. Se você não pediu, ignore este e-mail.</p>"
            ),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact() -> ContactMessage {
        ContactMessage {
            name: "João <script>".to_string(),
            email: "joao@example.org".to_string(),
            phone: None,
            subject: None,
            message: "Linha 1\nLinha 2".to_string(),
        }
    }

    #[test]
    fn test_contact_email_escapes_html() {
        let content = contact_email(&contact());
        assert!(content.html.contains("João &lt;script&gt;"));
        assert!(!content.html.contains("<script>"));
        assert!(content.html.contains("Linha 1<br>Linha 2"));
        assert!(content.text.contains("Telefone: -"));
        assert_eq!(content.subject, "[Contato] Mensagem de João <script>");
    }

    #[test]
    fn test_contact_subject_used_when_present() {
        let mut msg = contact();
        msg.subject = Some(" Sementes de ostra ".to_string());
        assert_eq!(contact_email(&msg).subject, "[Contato] Sementes de ostra");
    }

    #[test]
    fn test_welcome_and_reset_content() {
        let welcome = welcome_email("Ana", "48991234567", "s3nha-forte", "https://site.org");
        assert!(welcome.text.contains("Login: 48991234567"));
        assert!(welcome.html.contains("https://site.org/login"));

        let reset = password_reset_email("123456");
        assert!(reset.text.contains("123456"));
        assert!(reset.html.contains("123456"));
    }

    #[tokio::test]
    async fn test_disabled_mailer() {
        let mailer = Mailer::disabled("Teste <noreply@example.org>".parse().unwrap(), "http://x");
        assert!(!mailer.is_enabled());
        assert!(matches!(
            mailer.send_password_reset_code("ana@example.org", "123456").await,
            Err(EmailError::NotConfigured)
        ));
        // Synthetic addresses are skipped before the transport is needed
        assert!(
            mailer
                .send_password_reset_code("48991234567@phone.maricultura.local", "123456")
                .await
                .is_ok()
        );
    }
}
