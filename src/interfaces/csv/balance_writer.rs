use crate::domain::balance::Balance;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct BalanceRecord<'a> {
    member: u64,
    name: Option<&'a str>,
    currency: &'static str,
    value: Decimal,
}

/// Writes balances as CSV with a `member,name,currency,value` header.
///
/// Members without a display name get an empty `name` column.
pub struct BalanceWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> BalanceWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_balances<'a, I>(&mut self, balances: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Balance>,
    {
        for balance in balances {
            self.writer.serialize(BalanceRecord {
                member: balance.member_id.0,
                name: balance.display_name.as_deref(),
                currency: balance.currency.code(),
                value: balance.value,
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::group::Currency;
    use crate::domain::ids::MemberId;
    use rust_decimal_macros::dec;

    #[test]
    fn test_writes_header_and_rows() {
        let balances = vec![
            Balance {
                member_id: MemberId(2),
                display_name: Some("bob".to_string()),
                currency: Currency::Usd,
                value: dec!(-25.000),
            },
            Balance::zero(MemberId(3), Currency::Usd),
        ];

        let mut out = Vec::new();
        BalanceWriter::new(&mut out).write_balances(&balances).unwrap();
        let text = String::from_utf8(out).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec!["member,name,currency,value", "2,bob,USD,-25.000", "3,,USD,0"]
        );
    }
}
