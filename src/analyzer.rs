use crate::errors::{EmptyInputError, FormatError, ReportError};
use crate::loader::Record;
use log::debug;
use rust_decimal::Decimal;
use std::str::FromStr;

/// A reporting period with its financial figures parsed into exact decimals.
#[derive(Clone, Debug, PartialEq)]
pub struct Period {
    pub month: String,
    pub revenue: Decimal,
    pub expenses: Decimal,
    pub profit: Decimal,
}

impl TryFrom<&Record> for Period {
    type Error = FormatError;

    fn try_from(record: &Record) -> Result<Self, Self::Error> {
        Ok(Self {
            month: record.month.clone(),
            revenue: parse_amount(record, "Revenue", &record.revenue)?,
            expenses: parse_amount(record, "Expenses", &record.expenses)?,
            profit: parse_amount(record, "Profit", &record.profit)?,
        })
    }
}

/// Aggregate statistics over every period in the input.
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub total_revenue: Decimal,
    pub total_expenses: Decimal,
    pub total_profit: Decimal,

    /// The mean of each period's profit / revenue ratio, as a percentage.
    ///
    /// Note: this is a per-period average. It is NOT the same as
    /// `total_profit / total_revenue * 100` whenever revenue differs between
    /// periods.
    pub avg_profit_margin: Decimal,

    /// The number of periods summarized.
    pub period_count: usize,
}

impl Summary {
    /// Summarizes already parsed periods.
    ///
    /// Fails when there are no periods at all, or when any period reports
    /// zero revenue since its margin would be undefined.
    pub fn from_periods(periods: &[Period]) -> Result<Self, ReportError> {
        if periods.is_empty() {
            return Err(EmptyInputError.into());
        }

        let mut total_revenue = Decimal::ZERO;
        let mut total_expenses = Decimal::ZERO;
        let mut total_profit = Decimal::ZERO;
        let mut margin_sum = Decimal::ZERO;

        for period in periods {
            total_revenue = checked_sum(total_revenue, period.revenue, "Revenue")?;
            total_expenses = checked_sum(total_expenses, period.expenses, "Expenses")?;
            total_profit = checked_sum(total_profit, period.profit, "Profit")?;

            if period.revenue.is_zero() {
                return Err(FormatError::ZeroRevenue {
                    month: period.month.clone(),
                }
                .into());
            }
            let margin = period
                .profit
                .checked_div(period.revenue)
                .ok_or(FormatError::OutOfRange { column: "Profit" })?;
            margin_sum = checked_sum(margin_sum, margin, "Profit")?;
        }

        let avg_profit_margin = margin_sum
            .checked_div(Decimal::from(periods.len()))
            .and_then(|mean| mean.checked_mul(Decimal::ONE_HUNDRED))
            .ok_or(FormatError::OutOfRange { column: "Profit" })?;

        Ok(Self {
            total_revenue,
            total_expenses,
            total_profit,
            avg_profit_margin,
            period_count: periods.len(),
        })
    }
}

/// The analyzer's output: typed periods in input order plus their summary.
#[derive(Clone, Debug, PartialEq)]
pub struct Analysis {
    pub periods: Vec<Period>,
    pub summary: Summary,
}

/// Parses every record and computes the summary over them.
pub fn analyze(records: &[Record]) -> Result<Analysis, ReportError> {
    let periods = records
        .iter()
        .map(Period::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    let summary = Summary::from_periods(&periods)?;

    debug!(
        "summarized {} periods: revenue={} expenses={} profit={} margin={}",
        summary.period_count,
        summary.total_revenue,
        summary.total_expenses,
        summary.total_profit,
        summary.avg_profit_margin
    );

    Ok(Analysis { periods, summary })
}

/// Parses a decimal amount, accepting scientific notation as well as plain
/// decimals.
///
/// Text that is a finite number but does not fit in a `Decimal` is reported
/// as out of range rather than as not a number.
fn parse_amount(
    record: &Record,
    column: &'static str,
    value: &str,
) -> Result<Decimal, FormatError> {
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|_| match value.parse::<f64>() {
            Ok(number) if number.is_finite() => FormatError::OutOfRange { column },
            _ => FormatError::NotANumber {
                line: record.line,
                column,
                value: value.to_string(),
            },
        })
}

fn checked_sum(
    total: Decimal,
    value: Decimal,
    column: &'static str,
) -> Result<Decimal, FormatError> {
    total
        .checked_add(value)
        .ok_or(FormatError::OutOfRange { column })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(month: &str, revenue: &str, expenses: &str, profit: &str) -> Record {
        Record {
            line: 0,
            month: month.to_string(),
            revenue: revenue.to_string(),
            expenses: expenses.to_string(),
            profit: profit.to_string(),
        }
    }

    #[test]
    fn should_summarize_two_months() {
        let records = vec![
            record("Jan", "1000", "600", "400"),
            record("Feb", "1200", "700", "500"),
        ];

        let analysis = analyze(&records).unwrap();
        let summary = analysis.summary;

        assert_eq!(summary.total_revenue, dec!(2200));
        assert_eq!(summary.total_expenses, dec!(1300));
        assert_eq!(summary.total_profit, dec!(900));
        assert_eq!(summary.period_count, 2);
        assert_eq!(summary.avg_profit_margin.round_dp(2), dec!(40.83));

        // The typed periods come back in input order.
        let months: Vec<&str> = analysis.periods.iter().map(|p| p.month.as_str()).collect();
        assert_eq!(months, vec!["Jan", "Feb"]);
    }

    #[test]
    fn should_average_per_period_margins_rather_than_blend_totals() {
        // 10% on a small base and 50% on a large one.
        let records = vec![
            record("Jan", "100", "90", "10"),
            record("Feb", "900", "450", "450"),
        ];
        let summary = analyze(&records).unwrap().summary;

        let blended = summary.total_profit / summary.total_revenue * dec!(100);
        assert_eq!(summary.avg_profit_margin, dec!(30));
        assert_eq!(blended, dec!(46));
        assert_ne!(summary.avg_profit_margin, blended);
    }

    #[test]
    fn should_not_depend_on_row_order_for_totals() {
        let mut records = vec![
            record("Jan", "1000.10", "600.05", "400.05"),
            record("Feb", "1200.20", "700.10", "500.10"),
            record("Mar", "0.30", "0.10", "0.20"),
        ];
        let forward = analyze(&records).unwrap().summary;

        records.reverse();
        let backward = analyze(&records).unwrap().summary;

        assert_eq!(forward.total_revenue, backward.total_revenue);
        assert_eq!(forward.total_expenses, backward.total_expenses);
        assert_eq!(forward.total_profit, backward.total_profit);
        assert_eq!(forward.total_revenue, dec!(2200.60));
    }

    #[test]
    fn should_count_every_period() {
        let records: Vec<Record> = (1..=17)
            .map(|i| record(&format!("M{}", i), "100", "50", "50"))
            .collect();

        let summary = analyze(&records).unwrap().summary;
        assert_eq!(summary.period_count, records.len());
        assert_eq!(summary.avg_profit_margin, dec!(50));
    }

    #[test]
    fn should_fail_on_empty_input() {
        let err = analyze(&[]).unwrap_err();
        assert!(matches!(err, ReportError::EmptyInput(EmptyInputError)));
    }

    #[test]
    fn should_fail_on_non_numeric_revenue() {
        let mut bad = record("Feb", "n/a", "700", "500");
        bad.line = 3;
        let records = vec![record("Jan", "1000", "600", "400"), bad];

        match analyze(&records).unwrap_err() {
            ReportError::Format(FormatError::NotANumber {
                line,
                column,
                value,
            }) => {
                assert_eq!(line, 3);
                assert_eq!(column, "Revenue");
                assert_eq!(value, "n/a");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn should_fail_on_zero_revenue() {
        let records = vec![record("Jan", "0", "600", "-600")];
        let err = analyze(&records).unwrap_err();
        assert!(matches!(
            err,
            ReportError::Format(FormatError::ZeroRevenue { ref month }) if month == "Jan"
        ));
    }

    #[test]
    fn should_fail_when_revenue_total_overflows() {
        let records = vec![
            record("Jan", "79228162514264337593543950335", "0", "1"),
            record("Feb", "79228162514264337593543950335", "0", "1"),
        ];

        match analyze(&records).unwrap_err() {
            ReportError::Format(FormatError::OutOfRange { column }) => {
                assert_eq!(column, "Revenue")
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn should_fail_when_margin_overflows() {
        // A tiny revenue base blows the ratio past the decimal range.
        let records = vec![record(
            "Jan",
            "0.0000000000000000000000001",
            "0",
            "10000000000",
        )];

        match analyze(&records).unwrap_err() {
            ReportError::Format(FormatError::OutOfRange { column }) => {
                assert_eq!(column, "Profit")
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn should_report_huge_numbers_as_out_of_range() {
        let mut huge = record("Jan", "1e30", "600", "400");
        huge.line = 2;

        match Period::try_from(&huge).unwrap_err() {
            FormatError::OutOfRange { column } => assert_eq!(column, "Revenue"),
            other => panic!("unexpected error: {}", other),
        }

        // Non-finite spellings are still not numbers.
        let inf = record("Jan", "inf", "600", "400");
        assert!(matches!(
            Period::try_from(&inf).unwrap_err(),
            FormatError::NotANumber { .. }
        ));
    }

    #[test]
    fn should_parse_negative_and_scientific_amounts() {
        let period = Period::try_from(&record("Jan", "1.5e3", "2000", "-500")).unwrap();
        assert_eq!(period.revenue, dec!(1500));
        assert_eq!(period.profit, dec!(-500));
    }
}
