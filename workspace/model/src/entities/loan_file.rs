use chrono::NaiveDate;
use sea_orm::entity::prelude::*;

/// Lifecycle of a loan file. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum FileStatus {
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "CLOSED")]
    Closed,
}

impl FileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::Active => "ACTIVE",
            FileStatus::Closed => "CLOSED",
        }
    }

    /// Parses the upper-case wire form, ignoring surrounding whitespace and case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Some(FileStatus::Active),
            "CLOSED" => Some(FileStatus::Closed),
            _ => None,
        }
    }
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How often an installment is due. Only daily schedules exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum RepaymentFrequency {
    #[sea_orm(string_value = "DAILY")]
    Daily,
}

impl RepaymentFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepaymentFrequency::Daily => "DAILY",
        }
    }
}

/// One loan: the borrower, the repayment schedule and the cached running totals.
///
/// `total_received`, `transaction_count` and `bounce_count` are derived from the
/// file's transactions and are rewritten by the ledger after every mutation.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "files")]
pub struct Model {
    /// Sequential file number, assigned as max existing + 1.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub person_name: String,
    pub person_mobile: String,
    pub reference_mobile: String,
    pub address: String,
    pub business_name: String,
    pub business_address: String,
    pub principal_amount: i64,
    /// Expected payment per calendar day.
    pub installment: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: FileStatus,
    pub frequency: RepaymentFrequency,
    #[sea_orm(default_value = "0")]
    pub total_received: i64,
    #[sea_orm(default_value = "0")]
    pub bounce_count: i64,
    #[sea_orm(default_value = "0")]
    pub transaction_count: i64,
}

impl Model {
    /// Principal still outstanding. Negative when the borrower has over-paid.
    pub fn pending_amount(&self) -> i64 {
        self.principal_amount - self.total_received
    }

    pub fn is_active(&self) -> bool {
        self.status == FileStatus::Active
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::loan_transaction::Entity")]
    LoanTransaction,
}

impl Related<super::loan_transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LoanTransaction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
