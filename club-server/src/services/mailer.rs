//! Outbound email notifications.
//!
//! Sends two kinds of mail over async SMTP: a broadcast when a new event is
//! published, and a review request once an event has finished. When SMTP is
//! not configured the service degrades to a no-op and only logs, so
//! development setups work without a mail account.

use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::core::config::SmtpConfig;
use crate::db::models::Event;
use crate::utils::AppError;

#[derive(Clone)]
pub struct MailerService {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Option<Mailbox>,
}

impl MailerService {
    pub fn new(config: &SmtpConfig) -> Self {
        let (transport, from) = match (&config.server, &config.user, &config.password) {
            (Some(server), Some(user), Some(password)) => {
                let from = match format!("Espace Club <{}>", user).parse::<Mailbox>() {
                    Ok(mailbox) => mailbox,
                    Err(e) => {
                        tracing::error!(error = %e, "EMAIL_USER is not a valid address, mailer disabled");
                        return Self {
                            transport: None,
                            from: None,
                        };
                    }
                };

                match AsyncSmtpTransport::<Tokio1Executor>::relay(server) {
                    Ok(builder) => {
                        let creds = Credentials::new(user.clone(), password.clone());
                        (Some(builder.credentials(creds).build()), Some(from))
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to build SMTP transport, mailer disabled");
                        (None, None)
                    }
                }
            }
            _ => {
                tracing::warn!("SMTP not configured, email notifications disabled");
                (None, None)
            }
        };

        Self { transport, from }
    }

    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    /// Notify one user that a new event has been published.
    pub async fn send_event_notification(
        &self,
        to: &str,
        name: &str,
        event: &Event,
        event_link: &str,
    ) -> Result<(), AppError> {
        let body = format!(
            r#"Bonjour {name},

Un nouvel événement vient d'être publié :

  {event_name}
  Date : {date} à {time}
  Lieu : {location}
  Tickets disponibles : {tickets} ({price} TND le ticket)

Inscrivez-vous ici : {link}

Cordialement,
L'équipe Espace Club"#,
            name = name,
            event_name = event.event_name,
            date = event.event_date,
            time = event.start_time.format("%H:%M"),
            location = event.event_location,
            tickets = event.ticket_number,
            price = event.ticket_price,
            link = event_link,
        );

        self.send(to, "Nouvel Événement Publié", body).await
    }

    /// Ask one participant for a review after an event has finished.
    pub async fn send_review_request(
        &self,
        to: &str,
        name: &str,
        event_name: &str,
        review_link: &str,
    ) -> Result<(), AppError> {
        let body = format!(
            r#"Bonjour {name},

L'événement "{event_name}" est maintenant terminé. Nous espérons que vous
avez passé un bon moment !

Partagez votre avis ici : {review_link}

Cordialement,
L'équipe Espace Club"#,
        );

        self.send(to, &format!("Votre avis sur l'événement {}", event_name), body)
            .await
    }

    async fn send(&self, to: &str, subject: &str, body: String) -> Result<(), AppError> {
        let (Some(transport), Some(from)) = (&self.transport, &self.from) else {
            tracing::debug!(to = %to, subject = %subject, "Mailer disabled, skipping email");
            return Ok(());
        };

        let to_mailbox: Mailbox = to
            .parse()
            .map_err(|e| AppError::validation(format!("Invalid recipient address '{}': {}", to, e)))?;

        let email = Message::builder()
            .from(from.clone())
            .to(to_mailbox)
            .subject(subject)
            .body(body)
            .map_err(|e| AppError::internal(format!("Failed to build email: {}", e)))?;

        transport
            .send(email)
            .await
            .map_err(|e| AppError::internal(format!("Failed to send email to {}: {}", to, e)))?;

        tracing::info!(to = %to, subject = %subject, "Email sent");
        Ok(())
    }
}
