use crate::domain::user::User;
use crate::error::Result;
use std::io::Write;

/// Writes the final-balances report produced after a script replay.
///
/// Output is CSV with a `phone,name,balance` header, sorted by phone number
/// for a deterministic report.
pub struct ReportWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_users(&mut self, mut users: Vec<User>) -> Result<()> {
        users.sort_by(|a, b| a.phone_number.cmp(&b.phone_number));

        self.writer.write_record(["phone", "name", "balance"])?;
        for user in users {
            self.writer.write_record([
                user.phone_number.as_str(),
                user.name.as_str(),
                &user.balance.value().to_string(),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::Balance;

    #[test]
    fn test_report_is_sorted_by_phone() {
        let mut bob = User::new("08222222222", "123456", "Bob");
        bob.balance = Balance::new(25_000);
        let mut alice = User::new("08111111111", "123456", "Alice");
        alice.balance = Balance::new(78_800);

        let mut out = Vec::new();
        ReportWriter::new(&mut out)
            .write_users(vec![bob, alice])
            .unwrap();

        let report = String::from_utf8(out).unwrap();
        assert_eq!(
            report,
            "phone,name,balance\n08111111111,Alice,78800\n08222222222,Bob,25000\n"
        );
    }
}
