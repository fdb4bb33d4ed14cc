use chrono::NaiveDate;
use sea_orm::entity::prelude::*;

use crate::ledger::{PaymentMode, RECEIVED};

/// One repayment recorded against a loan file.
/// At most one exists per file and calendar date.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Owning file. Never changes after insert.
    pub file_id: i32,
    pub date: NaiveDate,
    pub amount: i64,
    /// Upper-case payment mode tag, see [`PaymentMode`].
    pub mode: String,
}

impl Model {
    pub fn payment_mode(&self) -> PaymentMode {
        PaymentMode::from_tag(&self.mode)
    }

    /// Persisted transactions are always received payments.
    pub fn status(&self) -> &'static str {
        RECEIVED
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::loan_file::Entity",
        from = "Column::FileId",
        to = "super::loan_file::Column::Id",
        on_delete = "Cascade"
    )]
    LoanFile,
}

impl Related<super::loan_file::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LoanFile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
