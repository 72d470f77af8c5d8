//! Expense and settlement repository for JSON storage

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::FairshareError;
use crate::models::{Expense, Settlement};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock, write_lock};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ExpenseData {
    expenses: Vec<Expense>,
    settlements: Vec<Settlement>,
}

/// Repository for the group ledger: expenses and the settlements against them
pub struct ExpenseRepository {
    path: PathBuf,
    data: RwLock<ExpenseData>,
}

impl ExpenseRepository {
    /// Create a new expense repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(ExpenseData::default()),
        }
    }

    /// Load expenses and settlements from disk
    pub fn load(&self) -> Result<(), FairshareError> {
        let file_data: ExpenseData = read_json(&self.path)?;
        *write_lock(&self.data)? = file_data;
        Ok(())
    }

    /// Save expenses and settlements to disk
    pub fn save(&self) -> Result<(), FairshareError> {
        let data = read_lock(&self.data)?;
        write_json_atomic(&self.path, &*data)
    }

    /// All expenses in the order recorded
    pub fn expenses(&self) -> Result<Vec<Expense>, FairshareError> {
        Ok(read_lock(&self.data)?.expenses.clone())
    }

    /// All settlements in the order recorded
    pub fn settlements(&self) -> Result<Vec<Settlement>, FairshareError> {
        Ok(read_lock(&self.data)?.settlements.clone())
    }

    pub fn insert_expense(&self, expense: Expense) -> Result<(), FairshareError> {
        write_lock(&self.data)?.expenses.push(expense);
        Ok(())
    }

    pub fn insert_settlement(&self, settlement: Settlement) -> Result<(), FairshareError> {
        write_lock(&self.data)?.settlements.push(settlement);
        Ok(())
    }
}
