use chrono::{DateTime, Utc};
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

use crate::config::SmtpConfig;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid mailbox address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("smtp transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Fee-reminder sender. Delivery is best-effort: callers log failures and
/// move on; no API response ever depends on it.
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl Mailer {
    pub fn from_config(config: &SmtpConfig) -> Result<Self, MailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();
        Ok(Self {
            transport,
            from: config.from.parse()?,
        })
    }

    pub async fn send_fee_reminder(&self, reminder: &FeeReminder<'_>) -> Result<(), MailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(reminder.to_email.parse()?)
            .subject(format!("Fee Reminder - {}", reminder.course_name))
            .body(reminder.body())?;
        self.transport.send(message).await?;
        Ok(())
    }
}

/// Everything the reminder text needs, pulled from the expanded fee
/// record at creation time.
pub struct FeeReminder<'a> {
    pub to_email: &'a str,
    pub student_name: &'a str,
    pub course_name: &'a str,
    pub amount: i64,
    pub due_date: DateTime<Utc>,
}

impl FeeReminder<'_> {
    fn body(&self) -> String {
        format!(
            "Dear {},\n\n\
             This is a reminder that you have a pending fee payment for the course \"{}\".\n\n\
             Fee Details:\n\
             - Amount: {}\n\
             - Due Date: {}\n\n\
             Please ensure payment is made before the due date to avoid any late fees.\n\n\
             If you have already made the payment, please contact your sales \
             representative to update the records.\n",
            self.student_name,
            self.course_name,
            self.amount,
            self.due_date.format("%d/%m/%Y"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn reminder_body_includes_fee_details() {
        let reminder = FeeReminder {
            to_email: "student@example.com",
            student_name: "Asha",
            course_name: "Data Science",
            amount: 45_000,
            due_date: Utc.with_ymd_and_hms(2025, 9, 15, 0, 0, 0).unwrap(),
        };
        let body = reminder.body();
        assert!(body.contains("Dear Asha"));
        assert!(body.contains("\"Data Science\""));
        assert!(body.contains("45000"));
        assert!(body.contains("15/09/2025"));
    }
}
