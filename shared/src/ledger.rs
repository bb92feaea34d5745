//! Mensalidade ledger: validation and aggregation over payment records
//!
//! Everything here is pure. Handlers load rows from PostgreSQL and hand them
//! to these functions, so the grid, the dashboard series, the per-method
//! summary and the member arrears check can be exercised without a database.
//!
//! Rules:
//! - at most one record per (maricultor, year, month), enforced by the
//!   database unique constraint and an upsert;
//! - `isento` records contribute nothing to revenue, whatever their amount;
//! - members flagged `fee_exempt` are never in arrears;
//! - months after the current month are never pending.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult, ErrorCode};
use crate::models::{LedgerMember, MonthlyPayment, PaymentCreate, PaymentMethod, PaymentUpdate};

pub const MIN_YEAR: i32 = 2000;
pub const MAX_YEAR: i32 = 2100;

/// Portuguese month abbreviations used in chart labels
const MONTH_ABBREV: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

// ── Recording ──

/// A payment ready to be upserted
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPayment {
    pub maricultor_id: i64,
    pub year: i32,
    pub month: i32,
    pub amount: Option<Decimal>,
    pub payment_method: PaymentMethod,
    pub paid_at: Option<i64>,
    pub notes: Option<String>,
}

pub fn validate_year(year: i32) -> AppResult<i32> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(AppError::new(ErrorCode::PaymentInvalidYear).with_detail("year", year));
    }
    Ok(year)
}

pub fn validate_month(month: i32) -> AppResult<i32> {
    if !(1..=12).contains(&month) {
        return Err(AppError::new(ErrorCode::PaymentInvalidMonth).with_detail("month", month));
    }
    Ok(month)
}

/// Validate a record-payment request.
///
/// A missing method becomes `outros`. For `isento` the payment date stays
/// empty unless the caller sent one; any other method defaults to `now_ms`.
pub fn validate_payment(input: &PaymentCreate, now_ms: i64) -> AppResult<ValidatedPayment> {
    let maricultor_id = input
        .maricultor_id
        .ok_or_else(|| AppError::required("maricultor_id"))?;
    let year = input.year.ok_or_else(|| AppError::required("year"))?;
    let month = input.month.ok_or_else(|| AppError::required("month"))?;

    let month = validate_month(month)?;
    let year = validate_year(year)?;

    let payment_method = input.payment_method.unwrap_or_default();
    let paid_at = if payment_method.is_exempt() {
        input.paid_at
    } else {
        Some(input.paid_at.unwrap_or(now_ms))
    };

    Ok(ValidatedPayment {
        maricultor_id,
        year,
        month,
        amount: input.amount,
        payment_method,
        paid_at,
        notes: clean_notes(input.notes.as_deref()),
    })
}

/// Normalize a partial update.
///
/// The method has already been coerced while deserializing. Notes are
/// trimmed; a blank string is kept as `Some("")` and clears the stored notes.
pub fn normalize_update(mut update: PaymentUpdate) -> PaymentUpdate {
    update.notes = update.notes.map(|n| n.trim().to_string());
    update
}

/// Switching a record to `isento` without a date drops the stored payment date
pub fn update_clears_paid_at(update: &PaymentUpdate) -> bool {
    update.paid_at.is_none() && update.payment_method.is_some_and(|m| m.is_exempt())
}

fn clean_notes(notes: Option<&str>) -> Option<String> {
    notes
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

// ── Year grid ──

/// One member's row in the year grid: slot 0 = January .. 11 = December
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberYearRow {
    #[serde(flatten)]
    pub member: LedgerMember,
    pub payments: [Option<MonthlyPayment>; 12],
}

/// Place each payment of `year` in its member's month slot.
///
/// Members come out sorted alphabetically by name. Payments for other years,
/// invalid months or members not in `members` are ignored.
pub fn build_year_grid(
    year: i32,
    mut members: Vec<LedgerMember>,
    payments: Vec<MonthlyPayment>,
) -> Vec<MemberYearRow> {
    members.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut rows: Vec<MemberYearRow> = members
        .into_iter()
        .map(|member| MemberYearRow {
            member,
            payments: Default::default(),
        })
        .collect();

    for payment in payments {
        if payment.year != year || !(1..=12).contains(&payment.month) {
            continue;
        }
        if let Some(row) = rows.iter_mut().find(|r| r.member.id == payment.maricultor_id) {
            let slot = (payment.month - 1) as usize;
            row.payments[slot] = Some(payment);
        }
    }

    rows
}

// ── Dashboard series ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStat {
    pub year: i32,
    pub month: u32,
    /// `"{Mon}/{YY}"`, e.g. `"Mar/25"`
    pub label: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total: Decimal,
}

/// (year, month) shifted by `delta` months
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year * 12 + (month as i32 - 1) + delta;
    (index.div_euclid(12), (index.rem_euclid(12) + 1) as u32)
}

pub fn month_label(year: i32, month: u32) -> String {
    let abbrev = MONTH_ABBREV[(month as usize).clamp(1, 12) - 1];
    format!("{abbrev}/{:02}", year.rem_euclid(100))
}

/// Revenue for the 12 months ending at `today`'s month, oldest first.
///
/// The window rolls: it is not aligned to the calendar year. Months without
/// payments are kept with a zero total.
pub fn monthly_stats(payments: &[MonthlyPayment], today: NaiveDate) -> Vec<MonthlyStat> {
    (0..12)
        .rev()
        .map(|back| {
            let (year, month) = shift_month(today.year(), today.month(), -back);
            let total = payments
                .iter()
                .filter(|p| p.year == year && p.month == month as i32)
                .filter(|p| !p.payment_method.is_exempt())
                .filter_map(|p| p.amount)
                .sum();
            MonthlyStat {
                year,
                month,
                label: month_label(year, month),
                total,
            }
        })
        .collect()
}

/// First (year, month) of the dashboard window, used to bound the query
pub fn monthly_stats_window_start(today: NaiveDate) -> (i32, u32) {
    shift_month(today.year(), today.month(), -11)
}

// ── Year summary ──

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodTotals {
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub dinheiro: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub pix: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub peixe: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub materiais: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub outros: Decimal,
}

impl MethodTotals {
    pub fn sum(&self) -> Decimal {
        self.dinheiro + self.pix + self.peixe + self.materiais + self.outros
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSummary {
    pub year: i32,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total: Decimal,
    pub by_method: MethodTotals,
    pub payment_count: usize,
    pub isento_count: usize,
    /// Members active right now, independent of `year`
    pub active_members: i64,
}

pub fn summarize_year(
    year: i32,
    payments: &[MonthlyPayment],
    active_members: i64,
) -> PaymentSummary {
    let mut by_method = MethodTotals::default();
    let mut payment_count = 0;
    let mut isento_count = 0;

    for payment in payments.iter().filter(|p| p.year == year) {
        let amount = payment.amount.unwrap_or_default();
        let bucket = match payment.payment_method {
            PaymentMethod::Isento => {
                isento_count += 1;
                continue;
            }
            PaymentMethod::Dinheiro => &mut by_method.dinheiro,
            PaymentMethod::Pix => &mut by_method.pix,
            PaymentMethod::Peixe => &mut by_method.peixe,
            PaymentMethod::Materiais => &mut by_method.materiais,
            PaymentMethod::Outros => &mut by_method.outros,
        };
        *bucket += amount;
        payment_count += 1;
    }

    PaymentSummary {
        year,
        total: by_method.sum(),
        by_method,
        payment_count,
        isento_count,
        active_members,
    }
}

// ── Member self-service ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberFeeStatus {
    pub year: i32,
    pub current_month: u32,
    pub fee_exempt: bool,
    pub paid_months: Vec<u32>,
    pub pending_months: Vec<u32>,
    pub em_dia: bool,
}

/// Arrears for the current year up to the current month.
///
/// `recorded_months` are the months of the current year that have a record,
/// whatever its method.
pub fn member_status(
    fee_exempt: bool,
    recorded_months: &[i32],
    today: NaiveDate,
) -> MemberFeeStatus {
    let current_month = today.month();

    if fee_exempt {
        return MemberFeeStatus {
            year: today.year(),
            current_month,
            fee_exempt,
            paid_months: Vec::new(),
            pending_months: Vec::new(),
            em_dia: true,
        };
    }

    let (paid_months, pending_months): (Vec<u32>, Vec<u32>) =
        (1..=current_month).partition(|m| recorded_months.contains(&(*m as i32)));

    MemberFeeStatus {
        year: today.year(),
        current_month,
        fee_exempt,
        em_dia: pending_months.is_empty(),
        paid_months,
        pending_months,
    }
}

// ── Reminders ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    /// First day of the month: the new mensalidade is due
    DueToday,
    /// One of the last three days of the month
    EndOfMonth,
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = shift_month(year, month, 1);
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

/// Which reminder, if any, the scheduled job should send on `date`
pub fn reminder_kind(date: NaiveDate) -> Option<ReminderKind> {
    let last_day = days_in_month(date.year(), date.month());
    if date.day() == 1 {
        Some(ReminderKind::DueToday)
    } else if date.day() + 2 >= last_day {
        Some(ReminderKind::EndOfMonth)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn member(id: i64, name: &str) -> LedgerMember {
        LedgerMember {
            id,
            name: name.to_string(),
            monthly_fee_amount: Some(Decimal::from(50)),
            association_date: None,
            fee_exempt: false,
        }
    }

    fn payment(
        id: i64,
        maricultor_id: i64,
        year: i32,
        month: i32,
        amount: Option<i64>,
        method: PaymentMethod,
    ) -> MonthlyPayment {
        MonthlyPayment {
            id,
            maricultor_id,
            year,
            month,
            amount: amount.map(Decimal::from),
            payment_method: method,
            paid_at: Some(1_700_000_000_000),
            notes: None,
            marked_by: Some(1),
            updated_at: 1_700_000_000_000,
        }
    }

    fn create(year: i32, month: i32) -> PaymentCreate {
        PaymentCreate {
            maricultor_id: Some(7),
            year: Some(year),
            month: Some(month),
            ..Default::default()
        }
    }

    // validate_payment

    #[test]
    fn month_boundaries_rejected() {
        for month in [0, 13, -1] {
            let err = validate_payment(&create(2025, month), 0).unwrap_err();
            assert_eq!(err.code, ErrorCode::PaymentInvalidMonth);
            assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
        }
        assert!(validate_payment(&create(2025, 1), 0).is_ok());
        assert!(validate_payment(&create(2025, 12), 0).is_ok());
    }

    #[test]
    fn year_boundaries_rejected() {
        for year in [1999, 2101] {
            let err = validate_payment(&create(year, 3), 0).unwrap_err();
            assert_eq!(err.code, ErrorCode::PaymentInvalidYear);
            assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
        }
        assert!(validate_payment(&create(2000, 3), 0).is_ok());
        assert!(validate_payment(&create(2100, 3), 0).is_ok());
    }

    #[test]
    fn missing_required_fields_rejected() {
        let mut input = create(2025, 3);
        input.maricultor_id = None;
        let err = validate_payment(&input, 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);

        let mut input = create(2025, 3);
        input.month = None;
        assert_eq!(
            validate_payment(&input, 0).unwrap_err().code,
            ErrorCode::RequiredField
        );

        let mut input = create(2025, 3);
        input.year = None;
        assert_eq!(
            validate_payment(&input, 0).unwrap_err().code,
            ErrorCode::RequiredField
        );
    }

    #[test]
    fn method_defaults_to_outros_and_paid_at_to_now() {
        let validated = validate_payment(&create(2025, 3), 42).unwrap();
        assert_eq!(validated.payment_method, PaymentMethod::Outros);
        assert_eq!(validated.paid_at, Some(42));
    }

    #[test]
    fn explicit_paid_at_is_kept() {
        let mut input = create(2025, 3);
        input.payment_method = Some(PaymentMethod::Pix);
        input.paid_at = Some(7);
        let validated = validate_payment(&input, 42).unwrap();
        assert_eq!(validated.paid_at, Some(7));
    }

    #[test]
    fn isento_leaves_paid_at_empty_unless_supplied() {
        let mut input = create(2025, 3);
        input.payment_method = Some(PaymentMethod::Isento);
        assert_eq!(validate_payment(&input, 42).unwrap().paid_at, None);

        input.paid_at = Some(9);
        assert_eq!(validate_payment(&input, 42).unwrap().paid_at, Some(9));
    }

    #[test]
    fn blank_notes_dropped() {
        let mut input = create(2025, 3);
        input.notes = Some("   ".to_string());
        assert_eq!(validate_payment(&input, 0).unwrap().notes, None);
        input.notes = Some(" pagou com 5kg de mexilhão ".to_string());
        assert_eq!(
            validate_payment(&input, 0).unwrap().notes.as_deref(),
            Some("pagou com 5kg de mexilhão")
        );
    }

    #[test]
    fn update_with_unknown_method_becomes_outros() {
        let update: PaymentUpdate =
            serde_json::from_str(r#"{"payment_method":"cheque","notes":"  "}"#).unwrap();
        let update = normalize_update(update);
        assert_eq!(update.payment_method, Some(PaymentMethod::Outros));
        assert_eq!(update.notes.as_deref(), Some(""));
        assert_eq!(update.amount, None);
    }

    #[test]
    fn switching_to_isento_clears_paid_at() {
        let mut update = PaymentUpdate {
            payment_method: Some(PaymentMethod::Isento),
            ..Default::default()
        };
        assert!(update_clears_paid_at(&update));

        update.paid_at = Some(9);
        assert!(!update_clears_paid_at(&update));

        let update = PaymentUpdate {
            payment_method: Some(PaymentMethod::Pix),
            ..Default::default()
        };
        assert!(!update_clears_paid_at(&update));
        assert!(!update_clears_paid_at(&PaymentUpdate::default()));
    }

    // build_year_grid

    #[test]
    fn grid_places_payment_at_month_minus_one() {
        let members = vec![member(1, "Maria")];
        let payments = vec![payment(10, 1, 2025, 3, Some(50), PaymentMethod::Pix)];
        let grid = build_year_grid(2025, members, payments);

        assert_eq!(grid.len(), 1);
        let slot = grid[0].payments[2].as_ref().unwrap();
        assert_eq!(slot.payment_method, PaymentMethod::Pix);
        assert_eq!(slot.amount, Some(Decimal::from(50)));
        assert_eq!(grid[0].payments.iter().filter(|p| p.is_some()).count(), 1);
    }

    #[test]
    fn grid_slot_empty_after_record_removed() {
        let members = vec![member(1, "Maria")];
        let grid = build_year_grid(2025, members, Vec::new());
        assert!(grid[0].payments[2].is_none());
    }

    #[test]
    fn grid_sorted_by_name_and_ignores_foreign_rows() {
        let members = vec![member(1, "Zé"), member(2, "ana"), member(3, "Bruno")];
        let payments = vec![
            payment(10, 1, 2024, 3, Some(50), PaymentMethod::Pix),
            payment(11, 99, 2025, 3, Some(50), PaymentMethod::Pix),
            payment(12, 2, 2025, 12, Some(30), PaymentMethod::Dinheiro),
        ];
        let grid = build_year_grid(2025, members, payments);

        let names: Vec<&str> = grid.iter().map(|r| r.member.name.as_str()).collect();
        assert_eq!(names, vec!["ana", "Bruno", "Zé"]);
        assert!(grid[2].payments.iter().all(Option::is_none));
        assert!(grid[0].payments[11].is_some());
    }

    #[test]
    fn grid_serializes_twelve_slots() {
        let grid = build_year_grid(2025, vec![member(1, "Maria")], Vec::new());
        let json = serde_json::to_value(&grid[0]).unwrap();
        assert_eq!(json["name"], "Maria");
        assert_eq!(json["payments"].as_array().unwrap().len(), 12);
    }

    // monthly_stats

    #[test]
    fn shift_month_crosses_years() {
        assert_eq!(shift_month(2025, 3, -11), (2024, 4));
        assert_eq!(shift_month(2025, 1, -1), (2024, 12));
        assert_eq!(shift_month(2024, 12, 1), (2025, 1));
        assert_eq!(shift_month(2025, 6, 0), (2025, 6));
    }

    #[test]
    fn labels_use_portuguese_abbreviations() {
        assert_eq!(month_label(2025, 3), "Mar/25");
        assert_eq!(month_label(2024, 2), "Fev/24");
        assert_eq!(month_label(2100, 12), "Dez/00");
    }

    #[test]
    fn stats_are_dense_rolling_and_ascending() {
        let payments = vec![
            payment(1, 1, 2025, 3, Some(50), PaymentMethod::Pix),
            payment(2, 2, 2025, 3, Some(30), PaymentMethod::Dinheiro),
            payment(3, 3, 2025, 3, Some(80), PaymentMethod::Isento),
            payment(4, 1, 2024, 4, Some(20), PaymentMethod::Peixe),
            payment(5, 1, 2024, 3, Some(999), PaymentMethod::Pix),
        ];
        let stats = monthly_stats(&payments, date(2025, 3, 15));

        assert_eq!(stats.len(), 12);
        assert_eq!(stats[0].label, "Abr/24");
        assert_eq!(stats[0].total, Decimal::from(20));
        assert_eq!(stats[11].label, "Mar/25");
        assert_eq!(stats[11].total, Decimal::from(80));
        assert!(stats[1..11].iter().all(|s| s.total.is_zero()));
        assert_eq!(monthly_stats_window_start(date(2025, 3, 15)), (2024, 4));
    }

    // summarize_year

    #[test]
    fn summary_total_equals_sum_of_method_buckets() {
        let payments = vec![
            payment(1, 1, 2025, 1, Some(50), PaymentMethod::Pix),
            payment(2, 1, 2025, 2, Some(40), PaymentMethod::Dinheiro),
            payment(3, 2, 2025, 1, Some(25), PaymentMethod::Peixe),
            payment(4, 2, 2025, 2, Some(10), PaymentMethod::Materiais),
            payment(5, 3, 2025, 1, None, PaymentMethod::Outros),
            payment(6, 3, 2025, 2, Some(7), PaymentMethod::Outros),
            payment(7, 4, 2025, 1, Some(50), PaymentMethod::Isento),
            payment(8, 4, 2024, 1, Some(1000), PaymentMethod::Pix),
        ];
        let summary = summarize_year(2025, &payments, 12);

        assert_eq!(summary.by_method.pix, Decimal::from(50));
        assert_eq!(summary.by_method.dinheiro, Decimal::from(40));
        assert_eq!(summary.by_method.peixe, Decimal::from(25));
        assert_eq!(summary.by_method.materiais, Decimal::from(10));
        assert_eq!(summary.by_method.outros, Decimal::from(7));
        assert_eq!(summary.total, summary.by_method.sum());
        assert_eq!(summary.total, Decimal::from(132));
        assert_eq!(summary.isento_count, 1);
        assert_eq!(summary.payment_count, 6);
        assert_eq!(summary.active_members, 12);
    }

    #[test]
    fn summary_of_empty_year() {
        let summary = summarize_year(2030, &[], 3);
        assert!(summary.total.is_zero());
        assert_eq!(summary.isento_count, 0);
        assert_eq!(summary.active_members, 3);
    }

    #[test]
    fn money_serializes_as_json_numbers() {
        let payments = vec![payment(1, 1, 2025, 3, Some(50), PaymentMethod::Pix)];
        let json = serde_json::to_value(summarize_year(2025, &payments, 1)).unwrap();
        assert_eq!(json["total"], serde_json::json!(50.0));
        assert_eq!(json["by_method"]["pix"], serde_json::json!(50.0));
        assert_eq!(json["by_method"]["dinheiro"], serde_json::json!(0.0));

        let mut record = payments[0].clone();
        record.amount = Some(Decimal::new(5050, 2));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["amount"], serde_json::json!(50.5));
        record.amount = None;
        assert!(serde_json::to_value(&record).unwrap()["amount"].is_null());

        let stats = monthly_stats(&payments, date(2025, 3, 10));
        assert_eq!(serde_json::to_value(&stats[11]).unwrap()["total"], serde_json::json!(50.0));
    }

    // member_status

    #[test]
    fn no_payments_in_march_means_three_pending() {
        let status = member_status(false, &[], date(2025, 3, 10));
        assert_eq!(status.paid_months, Vec::<u32>::new());
        assert_eq!(status.pending_months, vec![1, 2, 3]);
        assert!(!status.em_dia);
    }

    #[test]
    fn exempt_member_always_up_to_date() {
        let status = member_status(true, &[], date(2025, 11, 30));
        assert!(status.em_dia);
        assert!(status.pending_months.is_empty());
    }

    #[test]
    fn pending_never_exceeds_current_month() {
        for month in 1..=12 {
            let status = member_status(false, &[2, 9], date(2025, month, 1));
            assert!(status.pending_months.iter().all(|m| *m <= month));
            assert!(status.paid_months.iter().all(|m| *m <= month));
            assert_eq!(
                status.paid_months.len() + status.pending_months.len(),
                month as usize
            );
        }
    }

    #[test]
    fn fully_paid_member_is_em_dia() {
        let status = member_status(false, &[1, 2, 3, 4], date(2025, 3, 31));
        assert_eq!(status.paid_months, vec![1, 2, 3]);
        assert!(status.em_dia);
    }

    // reminders

    #[test]
    fn reminder_days() {
        assert_eq!(reminder_kind(date(2025, 3, 1)), Some(ReminderKind::DueToday));
        assert_eq!(reminder_kind(date(2025, 3, 2)), None);
        assert_eq!(reminder_kind(date(2025, 3, 28)), None);
        assert_eq!(reminder_kind(date(2025, 3, 29)), Some(ReminderKind::EndOfMonth));
        assert_eq!(reminder_kind(date(2025, 3, 31)), Some(ReminderKind::EndOfMonth));
        assert_eq!(reminder_kind(date(2025, 2, 26)), Some(ReminderKind::EndOfMonth));
        assert_eq!(reminder_kind(date(2025, 2, 25)), None);
        assert_eq!(reminder_kind(date(2024, 2, 27)), Some(ReminderKind::EndOfMonth));
        assert_eq!(reminder_kind(date(2024, 2, 26)), None);
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2025, 12), 31);
        assert_eq!(days_in_month(2025, 4), 30);
    }
}
