use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::MemoryStore;
use crate::models::*;

const CATEGORIES: &str = "categories.csv";
const EXPENSES: &str = "expenses.csv";
const BUDGETS: &str = "budgets.csv";
const INCOMES: &str = "incomes.csv";
const SAVINGS: &str = "savings.csv";
const WISHLIST: &str = "wishlist.csv";

/// A directory of CSV exports, one file per collection.
pub(crate) struct Snapshot {
    dir: PathBuf,
}

impl Snapshot {
    pub(crate) fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    /// Load every collection. Missing files are empty collections, except
    /// categories, which fall back to the seeded defaults.
    pub(crate) fn load(&self) -> Result<MemoryStore> {
        let categories = self
            .load_table(CATEGORIES, parse_category)?
            .unwrap_or_else(Category::defaults);

        let store = MemoryStore {
            categories,
            expenses: self.load_rows(EXPENSES, parse_expense)?,
            budgets: self.load_rows(BUDGETS, parse_budget)?,
            incomes: self.load_rows(INCOMES, parse_income)?,
            savings: self.load_rows(SAVINGS, parse_savings)?,
            wishlist: self.load_rows(WISHLIST, parse_wishlist_item)?,
        };

        tracing::debug!(
            dir = %self.dir.display(),
            categories = store.categories.len(),
            expenses = store.expenses.len(),
            budgets = store.budgets.len(),
            "loaded snapshot"
        );
        Ok(store)
    }

    fn load_rows<T>(&self, file: &str, parse: fn(&Row) -> Result<T>) -> Result<Vec<T>> {
        Ok(self.load_table(file, parse)?.unwrap_or_default())
    }

    /// Parse every row of `file`, or `None` when the file does not exist.
    fn load_table<T>(&self, file: &str, parse: fn(&Row) -> Result<T>) -> Result<Option<Vec<T>>> {
        let Some(table) = read_table(&self.path(file))? else {
            return Ok(None);
        };
        table
            .rows()
            .map(|row| parse(&row).with_context(|| format!("{file} line {}", row.line)))
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    /// Write budgets back out, along with categories when the directory has
    /// none yet (so seeded ids stay stable).
    pub(crate) fn write_budgets(&self, store: &MemoryStore) -> Result<()> {
        if !self.path(CATEGORIES).exists() {
            self.write_categories(store)?;
        }
        let mut wtr = self.writer(BUDGETS)?;
        wtr.write_record(["id", "category_id", "month", "amount"])?;
        for b in &store.budgets {
            wtr.write_record([
                b.id.map(|id| id.to_string()).unwrap_or_default(),
                b.category_id.to_string(),
                b.month.as_param(),
                optional_amount(b.amount),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub(crate) fn write_savings(&self, store: &MemoryStore) -> Result<()> {
        let mut wtr = self.writer(SAVINGS)?;
        wtr.write_record(["id", "month", "amount"])?;
        for s in &store.savings {
            wtr.write_record([
                s.id.map(|id| id.to_string()).unwrap_or_default(),
                s.month.as_param(),
                optional_amount(s.amount),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub(crate) fn write_expenses(&self, store: &MemoryStore) -> Result<()> {
        let mut wtr = self.writer(EXPENSES)?;
        wtr.write_record(["id", "amount", "category", "category_id", "date", "description"])?;
        for e in &store.expenses {
            wtr.write_record([
                e.id.map(|id| id.to_string()).unwrap_or_default(),
                e.amount.to_string(),
                e.category.clone(),
                e.category_id.map(|id| id.to_string()).unwrap_or_default(),
                e.date.format("%Y-%m-%d").to_string(),
                e.description.clone().unwrap_or_default(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub(crate) fn write_incomes(&self, store: &MemoryStore) -> Result<()> {
        let mut wtr = self.writer(INCOMES)?;
        wtr.write_record(["id", "source", "amount", "date", "is_recurring", "frequency", "notes"])?;
        for i in &store.incomes {
            wtr.write_record([
                i.id.map(|id| id.to_string()).unwrap_or_default(),
                i.source.clone(),
                i.amount.to_string(),
                i.date.format("%Y-%m-%d").to_string(),
                i.is_recurring.to_string(),
                i.frequency.map(|f| f.as_str().to_string()).unwrap_or_default(),
                i.notes.clone().unwrap_or_default(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub(crate) fn write_wishlist(&self, store: &MemoryStore) -> Result<()> {
        let mut wtr = self.writer(WISHLIST)?;
        wtr.write_record(["id", "item_name", "price", "url", "image_url", "notes"])?;
        for w in &store.wishlist {
            wtr.write_record([
                w.id.map(|id| id.to_string()).unwrap_or_default(),
                w.item_name.clone(),
                w.price.to_string(),
                w.url.clone().unwrap_or_default(),
                w.image_url.clone().unwrap_or_default(),
                w.notes.clone().unwrap_or_default(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub(crate) fn write_categories(&self, store: &MemoryStore) -> Result<()> {
        let mut wtr = self.writer(CATEGORIES)?;
        wtr.write_record(["id", "name", "icon", "color", "is_custom"])?;
        for c in &store.categories {
            wtr.write_record([
                c.id.map(|id| id.to_string()).unwrap_or_default(),
                c.name.clone(),
                c.icon.clone(),
                c.color.clone(),
                c.is_custom.to_string(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn writer(&self, file: &str) -> Result<csv::Writer<std::fs::File>> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create data directory: {}", self.dir.display()))?;
        let path = self.path(file);
        csv::Writer::from_path(&path)
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

// ── Reading ──────────────────────────────────────────────────

struct Table {
    headers: Vec<String>,
    records: Vec<csv::StringRecord>,
}

struct Row<'a> {
    headers: &'a [String],
    record: &'a csv::StringRecord,
    line: usize,
}

impl Table {
    fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.records.iter().enumerate().map(|(i, record)| Row {
            headers: &self.headers,
            record,
            line: i + 2,
        })
    }
}

impl Row<'_> {
    /// Trimmed field value by header name; empty when the column is absent.
    fn field(&self, name: &str) -> &str {
        self.headers
            .iter()
            .position(|h| h == name)
            .and_then(|i| self.record.get(i))
            .map(str::trim)
            .unwrap_or("")
    }

    fn optional(&self, name: &str) -> Option<String> {
        let value = self.field(name);
        (!value.is_empty()).then(|| value.to_string())
    }

    fn id(&self, name: &str) -> Result<Option<i64>> {
        let value = self.field(name);
        if value.is_empty() {
            return Ok(None);
        }
        value
            .parse::<i64>()
            .map(Some)
            .with_context(|| format!("Invalid {name} '{value}'"))
    }

    fn required(&self, name: &str) -> Result<&str> {
        let value = self.field(name);
        if value.is_empty() {
            anyhow::bail!("Missing {name}");
        }
        Ok(value)
    }
}

fn read_table(path: &Path) -> Result<Option<Table>> {
    if !path.exists() {
        return Ok(None);
    }

    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let headers = rdr
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let mut records = Vec::new();
    for result in rdr.records() {
        let record = result.context("Failed to read CSV record")?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        records.push(record);
    }

    Ok(Some(Table { headers, records }))
}

fn parse_category(row: &Row) -> Result<Category> {
    let id = row.id("id")?.ok_or_else(|| anyhow::anyhow!("Missing id"))?;
    Ok(Category {
        id: Some(id),
        name: row.required("name")?.to_string(),
        icon: row.field("icon").to_string(),
        color: row.field("color").to_string(),
        is_custom: parse_bool(row.field("is_custom")),
    })
}

fn parse_expense(row: &Row) -> Result<Expense> {
    Ok(Expense {
        id: row.id("id")?,
        amount: parse_decimal(row.required("amount")?)?,
        category: row.required("category")?.to_string(),
        category_id: row.id("category_id")?,
        date: parse_date(row.required("date")?)?,
        description: row.optional("description"),
    })
}

fn parse_budget(row: &Row) -> Result<CategoryBudget> {
    Ok(CategoryBudget {
        id: row.id("id")?,
        category_id: row
            .id("category_id")?
            .ok_or_else(|| anyhow::anyhow!("Missing category_id"))?,
        month: row.required("month")?.parse()?,
        amount: parse_optional_decimal(row.field("amount"))?,
    })
}

fn parse_income(row: &Row) -> Result<Income> {
    let frequency = row.field("frequency");
    Ok(Income {
        id: row.id("id")?,
        source: row.required("source")?.to_string(),
        amount: parse_decimal(row.required("amount")?)?,
        date: parse_date(row.required("date")?)?,
        is_recurring: parse_bool(row.field("is_recurring")),
        frequency: Frequency::parse(frequency),
        notes: row.optional("notes"),
    })
}

fn parse_savings(row: &Row) -> Result<Savings> {
    Ok(Savings {
        id: row.id("id")?,
        month: row.required("month")?.parse()?,
        amount: parse_optional_decimal(row.field("amount"))?,
    })
}

fn parse_wishlist_item(row: &Row) -> Result<WishlistItem> {
    Ok(WishlistItem {
        id: row.id("id")?,
        item_name: row.required("item_name")?.to_string(),
        price: parse_decimal(row.required("price")?)?,
        url: row.optional("url"),
        image_url: row.optional("image_url"),
        notes: row.optional("notes"),
    })
}

/// ISO first, then day-first slashes; month-first only when day-first
/// cannot be a date.
fn parse_date(s: &str) -> Result<NaiveDate> {
    for fmt in &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    anyhow::bail!("Could not parse date: {}", s)
}

fn parse_decimal(s: &str) -> Result<Decimal> {
    let cleaned = s.replace(['€', '$', ','], "");
    Decimal::from_str(cleaned.trim()).with_context(|| format!("Failed to parse '{s}' as decimal"))
}

/// Blank means "not set", which is distinct from zero.
fn parse_optional_decimal(s: &str) -> Result<Option<Decimal>> {
    if s.is_empty() {
        return Ok(None);
    }
    parse_decimal(s).map(Some)
}

fn parse_bool(s: &str) -> bool {
    matches!(s.to_lowercase().as_str(), "true" | "1" | "yes" | "y")
}

fn optional_amount(amount: Option<Decimal>) -> String {
    amount.map(|a| a.to_string()).unwrap_or_default()
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
