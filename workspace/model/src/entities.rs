//! Root of the SeaORM entity modules: loan files and the repayments recorded
//! against them.

pub mod loan_file;
pub mod loan_transaction;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::loan_file::Entity as LoanFile;
    pub use super::loan_transaction::Entity as LoanTransaction;
}
