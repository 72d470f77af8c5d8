//! Expense service
//!
//! Records group expenses split with one of the split calculators, records
//! repayments, and nets everyone's position.

use tracing::info;

use super::balance::{calculate_group_balances, MemberBalance};
use super::split::{calculate_split, validate_split_data, SplitParams};
use crate::audit::EntityType;
use crate::error::{FairshareError, FairshareResult};
use crate::models::{round_to_cents, Expense, MemberId, Settlement, SplitMethod};
use crate::storage::Storage;

/// Service for the group ledger
pub struct ExpenseService<'a> {
    storage: &'a Storage,
}

impl<'a> ExpenseService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record an expense paid by one member and split among several
    pub fn add(
        &self,
        description: &str,
        amount: f64,
        paid_by: MemberId,
        method: SplitMethod,
        params: &SplitParams,
    ) -> FairshareResult<Expense> {
        let description = description.trim();
        if description.is_empty() {
            return Err(FairshareError::Validation(
                "Expense description cannot be empty".into(),
            ));
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(FairshareError::Validation(
                "Expense amount must be greater than zero".into(),
            ));
        }

        let amount = round_to_cents(amount);
        validate_split_data(method, amount, params).into_result()?;

        let splits = calculate_split(method, amount, params);
        if splits.is_empty() {
            return Err(FairshareError::Validation(
                "Split produced no shares; check the split data".into(),
            ));
        }

        let expense = Expense::new(description, amount, paid_by, method, splits);
        self.storage.expenses.insert_expense(expense.clone())?;
        self.storage.expenses.save()?;

        self.storage.log_create(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.description.clone()),
            &expense,
        );

        info!(expense = %expense.id, amount, method = %method, "expense recorded");
        Ok(expense)
    }

    /// Record a repayment between two members
    pub fn settle(
        &self,
        from_member: MemberId,
        to_member: MemberId,
        amount: f64,
    ) -> FairshareResult<Settlement> {
        if from_member == to_member {
            return Err(FairshareError::Validation(
                "A member cannot settle with themselves".into(),
            ));
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(FairshareError::Validation(
                "Settlement amount must be greater than zero".into(),
            ));
        }

        let settlement = Settlement::new(from_member, to_member, round_to_cents(amount));
        self.storage
            .expenses
            .insert_settlement(settlement.clone())?;
        self.storage.expenses.save()?;

        self.storage.log_create(
            EntityType::Settlement,
            settlement.id.to_string(),
            None,
            &settlement,
        );

        info!(settlement = %settlement.id, amount = settlement.amount, "settlement recorded");
        Ok(settlement)
    }

    pub fn list(&self) -> FairshareResult<Vec<Expense>> {
        self.storage.expenses.expenses()
    }

    /// Net position of every member
    pub fn balances(&self) -> FairshareResult<Vec<MemberBalance>> {
        let expenses = self.storage.expenses.expenses()?;
        let settlements = self.storage.expenses.settlements()?;
        let members = self.storage.members.get_all()?;
        Ok(calculate_group_balances(&expenses, &settlements, &members))
    }
}
