use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::error::{AtelierError, AtelierResult};

/// Notification payload for a new order; list-valued attributes arrive
/// already joined for display.
pub struct OrderNotification {
    pub phone: String,
    pub kind: String,
    pub size: String,
    pub color: String,
    pub pattern: String,
    pub pattern_color: String,
    pub delivery_date: String,
    pub delivery_type: String,
    pub delivery_address: String,
    pub registered_by: String,
}

/// SMTP notification collaborator. Constructed from env in `main`; when the
/// credentials are absent the service simply runs without it.
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: String,
    recipient: String,
}

impl Mailer {
    /// Build from `SMTP_RELAY` / `SENDER_EMAIL` / `SENDER_PASSWORD` /
    /// `ORDER_EMAIL_TO`. Returns `None` when `SENDER_PASSWORD` is unset.
    pub fn from_env() -> Option<Self> {
        let password = std::env::var("SENDER_PASSWORD")
            .ok()
            .filter(|p| !p.trim().is_empty())?;
        let relay = std::env::var("SMTP_RELAY").unwrap_or_else(|_| "smtp.gmail.com".to_string());
        let sender =
            std::env::var("SENDER_EMAIL").unwrap_or_else(|_| "noreply@example.com".to_string());
        let recipient =
            std::env::var("ORDER_EMAIL_TO").unwrap_or_else(|_| "badamrinchin@gmail.com".to_string());

        let transport = match AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&relay) {
            Ok(builder) => builder
                .credentials(Credentials::new(sender.clone(), password))
                .build(),
            Err(e) => {
                tracing::warn!("SMTP relay {} not usable: {}", relay, e);
                return None;
            }
        };

        Some(Self {
            transport,
            sender,
            recipient,
        })
    }

    pub async fn send_order_email(&self, order: &OrderNotification) -> AtelierResult<()> {
        let message = Message::builder()
            .from(
                self.sender
                    .parse()
                    .map_err(|e| AtelierError::Mail(format!("bad sender address: {}", e)))?,
            )
            .to(self
                .recipient
                .parse()
                .map_err(|e| AtelierError::Mail(format!("bad recipient address: {}", e)))?)
            .subject("Шинэ захиалга ирлээ")
            .header(ContentType::TEXT_HTML)
            .body(render_order_html(order))
            .map_err(|e| AtelierError::Mail(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AtelierError::Mail(e.to_string()))?;

        tracing::info!("Order notification sent to {}", self.recipient);
        Ok(())
    }
}

fn render_order_html(order: &OrderNotification) -> String {
    let rows = [
        ("Утас", &order.phone),
        ("Төрөл", &order.kind),
        ("Хэмжээ", &order.size),
        ("Өнгө", &order.color),
        ("Хээ", &order.pattern),
        ("Хээний өнгө", &order.pattern_color),
        ("Хүлээлгэн өгөх огноо", &order.delivery_date),
        ("Хүргэлтийн төрөл", &order.delivery_type),
        ("Хаяг", &order.delivery_address),
        ("Бүртгэсэн", &order.registered_by),
    ];

    let mut table = String::new();
    for (i, (label, value)) in rows.iter().enumerate() {
        let bg = if i % 2 == 0 {
            " style=\"background-color: #f5f5f5;\""
        } else {
            ""
        };
        table.push_str(&format!(
            "<tr{bg}>\
             <td style=\"padding: 10px; border: 1px solid #ddd;\"><strong>{label}</strong></td>\
             <td style=\"padding: 10px; border: 1px solid #ddd;\">{value}</td>\
             </tr>"
        ));
    }

    format!(
        "<html><body style=\"font-family: Arial, sans-serif; color: #333;\">\
         <h2 style=\"color: #4f46e5;\">Шинэ захиалга ирлээ</h2>\
         <table style=\"border-collapse: collapse; width: 100%; margin-top: 20px;\">{table}</table>\
         <p style=\"margin-top: 20px; color: #666; font-size: 12px;\">\
         Энэ имэйл автоматаар үүсэгдсэн болно.</p>\
         </body></html>"
    )
}
