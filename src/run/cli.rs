use anyhow::{Context, Result};

use super::report;
use crate::analytics::{stack_category_spend, DashboardOverview};
use crate::budget::{save_savings, BudgetBoard, Notice, NoticeLevel, SortKey};
use crate::config::{take_flag, take_switch, Config};
use crate::error::BudgetError;
use crate::models::{
    optional_text, parse_amount, parse_date, required_text, Category, ExpensePatch, Frequency,
    IncomePatch, MonthKey, NewExpense, NewIncome, NewWishlistItem, Purchase, WishlistPatch,
    PURCHASE_CATEGORY,
};
use crate::store::{MemoryStore, Snapshot, Store};

pub(crate) fn as_cli(args: &[String], config: &Config) -> Result<()> {
    let command = args.get(1).map(String::as_str).unwrap_or("budgets");
    let rest = args.get(2..).unwrap_or_default().to_vec();

    match command {
        "budgets" | "b" => cli_budgets(rest, config),
        "set-budget" => cli_set_budget(rest, config),
        "savings" => cli_savings(rest, config),
        "add-expense" | "add" => cli_add_expense(rest, config),
        "expenses" | "e" => cli_expenses(rest, config),
        "edit-expense" => cli_edit_expense(rest, config),
        "delete-expense" => cli_delete_expense(rest, config),
        "incomes" => cli_incomes(config),
        "add-income" => cli_add_income(rest, config),
        "edit-income" => cli_edit_income(rest, config),
        "delete-income" => cli_delete_income(rest, config),
        "wishlist" | "w" => cli_wishlist(config),
        "add-wish" => cli_add_wish(rest, config),
        "edit-wish" => cli_edit_wish(rest, config),
        "delete-wish" => cli_delete_wish(rest, config),
        "buy" => cli_buy(rest, config),
        "trend" => cli_trend(config),
        "summary" | "s" => cli_summary(rest, config),
        "categories" => cli_categories(config),
        "add-category" => cli_add_category(rest, config),
        "delete-category" => cli_delete_category(rest, config),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("budget-tracker {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("budget-tracker — monthly budgets, spending and savings");
    println!();
    println!("Usage: budget-tracker [--data <dir>] [command]");
    println!();
    println!("Commands:");
    println!("  (none), budgets                   Show budget usage per category");
    println!("    --month <YYYY-MM>               Month to show (default: current)");
    println!("    --sort <key>                    name, spent, budget or remaining");
    println!("  set-budget <category> <amount>    Set a category's budget; 'clear' or 0 removes it");
    println!("    --month <YYYY-MM>               Month to budget (default: current)");
    println!("  savings [amount|clear]            Show or set the month's savings");
    println!("    --month <YYYY-MM>               Month (default: current)");
    println!("  add-expense <amount> <category>   Record an expense");
    println!("    --date <YYYY-MM-DD>             Date (default: today)");
    println!("    --note <text>                   Description");
    println!("  expenses, e                       List a month's expenses with ids");
    println!("    --month <YYYY-MM>               Month (default: current)");
    println!("  edit-expense <id>                 Change an expense");
    println!("    --amount, --category, --date, --note");
    println!("  delete-expense <id>               Remove an expense");
    println!("  incomes                           List income records");
    println!("  add-income <amount> <source>      Record income");
    println!("    --date <YYYY-MM-DD>             Date (default: today)");
    println!("    --recurring <frequency>         weekly, biweekly, monthly or yearly");
    println!("    --note <text>                   Notes");
    println!("  edit-income <id>                  Change an income record");
    println!("    --source, --amount, --date, --recurring <frequency>, --one-off, --note");
    println!("  delete-income <id>                Remove an income record");
    println!("  wishlist, w                       List wishlist items");
    println!("  add-wish <price> <name>           Add a wishlist item");
    println!("    --url <link>, --note <text>");
    println!("  edit-wish <id>                    Change a wishlist item");
    println!("    --name, --price, --url, --note");
    println!("  delete-wish <id>                  Remove a wishlist item");
    println!("  buy <id>                          Record an item as an expense and remove it");
    println!("    --date <YYYY-MM-DD>             Purchase date (default: today)");
    println!("    --category <name>               Expense category (default: {PURCHASE_CATEGORY})");
    println!("  trend                             Spending by category, last six months");
    println!("  summary [YYYY-MM]                 Print the monthly overview");
    println!("  categories                        List categories");
    println!("  add-category <name>               Add a custom category");
    println!("    --icon <icon>, --color <color>");
    println!("  delete-category <id|name>         Remove a custom category and its budgets");
    println!("  --help, -h                        Show this help");
    println!("  --version, -V                     Show version");
    println!();
    println!("Data directory: --data, ${}, or the platform default", crate::config::DATA_ENV);
}

fn open(config: &Config) -> Result<(Snapshot, MemoryStore)> {
    let snapshot = Snapshot::new(&config.data_dir);
    let store = snapshot
        .load()
        .with_context(|| format!("Failed to load data from {}", config.data_dir.display()))?;
    Ok((snapshot, store))
}

fn month_flag(args: &mut Vec<String>) -> Result<MonthKey> {
    match take_flag(args, "--month")? {
        Some(value) => Ok(value.parse()?),
        None => Ok(MonthKey::current()),
    }
}

fn print_notices(notices: Vec<Notice>) {
    for notice in notices {
        match notice.level {
            NoticeLevel::Success => println!("{}", notice.message),
            NoticeLevel::Error => eprintln!("{}", notice.message),
        }
    }
}

fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// The record id a command acts on.
fn record_id(args: &[String], usage: &str) -> Result<i64> {
    let Some(value) = args.first() else {
        anyhow::bail!("Usage: budget-tracker {usage}");
    };
    value
        .parse::<i64>()
        .with_context(|| format!("Invalid id '{value}'"))
}

fn ensure_changes(empty: bool) -> Result<()> {
    if empty {
        anyhow::bail!("Nothing to change; pass at least one field flag");
    }
    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

/// Look a category up by id or by name, refusing the savings category.
fn resolve_category<'a>(categories: &'a [Category], query: &str) -> Result<&'a Category> {
    let found = query
        .parse::<i64>()
        .ok()
        .and_then(|id| Category::find_by_id(categories, id))
        .or_else(|| Category::find_by_name(categories, query))
        .ok_or_else(|| anyhow::anyhow!("Category '{query}' not found"))?;
    if found.is_savings() {
        anyhow::bail!("Savings is tracked per month; use the savings command");
    }
    Ok(found)
}

fn cli_budgets(mut args: Vec<String>, config: &Config) -> Result<()> {
    let month = month_flag(&mut args)?;
    let sort = match take_flag(&mut args, "--sort")? {
        Some(key) => SortKey::parse(&key).ok_or_else(|| {
            let keys: Vec<&str> = SortKey::all().iter().map(SortKey::as_str).collect();
            anyhow::anyhow!("Unknown sort '{key}', expected one of: {}", keys.join(", "))
        })?,
        None => SortKey::default(),
    };

    let (_, store) = open(config)?;
    let mut board = BudgetBoard::new(month);
    board.set_sort(sort);
    board.refresh(&store);
    print_notices(board.take_notices());

    print_lines(&report::budget_lines(board.month(), board.sort(), &board.rows()));
    Ok(())
}

fn cli_set_budget(mut args: Vec<String>, config: &Config) -> Result<()> {
    let month = month_flag(&mut args)?;
    if args.len() < 2 {
        anyhow::bail!("Usage: budget-tracker set-budget <category> <amount|clear> [--month YYYY-MM]");
    }
    let amount = args.pop().unwrap_or_default();
    let query = args.join(" ");
    let draft = if amount.eq_ignore_ascii_case("clear") {
        String::new()
    } else {
        amount
    };

    let (snapshot, mut store) = open(config)?;
    let mut board = BudgetBoard::new(month);
    board.refresh(&store);
    print_notices(board.take_notices());
    let category = resolve_category(board.categories(), &query)?;
    let (category_id, name) = match category.id {
        Some(id) => (id, category.name.clone()),
        None => anyhow::bail!("Category '{}' has no id", category.name),
    };

    board.edit_draft(category_id, draft);
    let saved = match board.save_budget(&mut store, category_id) {
        Ok(saved) => saved,
        Err(e) => {
            // the error itself is reported by the caller
            board.take_notices();
            let hint = if e.is_validation() {
                "Use a non-negative number, 0 or 'clear'"
            } else {
                "Budget not saved"
            };
            return Err(anyhow::Error::new(e).context(hint));
        }
    };
    print_notices(board.take_notices());

    match saved {
        Some(_) => snapshot.write_budgets(&store)?,
        None => println!("{name} budget for {} is unchanged.", month.label()),
    }

    if let Some(row) = board.rows().into_iter().find(|r| r.category_id == category_id) {
        print_lines(&report::budget_lines(month, board.sort(), &[row]));
    }
    Ok(())
}

fn cli_savings(mut args: Vec<String>, config: &Config) -> Result<()> {
    let month = month_flag(&mut args)?;
    let (snapshot, mut store) = open(config)?;

    let Some(value) = args.first() else {
        let current = store.savings(month).map_err(BudgetError::fetch("savings"))?;
        let amount = current.and_then(|s| s.amount);
        println!(
            "Savings for {}: {}",
            month.label(),
            crate::format::format_optional_currency(amount)
        );
        return Ok(());
    };

    let draft = if value.eq_ignore_ascii_case("clear") {
        ""
    } else {
        value.as_str()
    };
    let saved = save_savings(&mut store, month, draft)?;
    snapshot.write_savings(&store)?;

    match saved.amount {
        Some(amount) => println!(
            "Savings updated: {} for {}",
            crate::format::format_currency(amount),
            month.label()
        ),
        None => println!("Savings cleared for {}.", month.label()),
    }
    Ok(())
}

fn cli_add_expense(mut args: Vec<String>, config: &Config) -> Result<()> {
    let date = take_flag(&mut args, "--date")?.unwrap_or_else(today);
    let note = take_flag(&mut args, "--note")?.unwrap_or_default();
    let amount = args.first().cloned().unwrap_or_default();
    let category = args.get(1..).unwrap_or_default().join(" ");

    let form = NewExpense::parse(&amount, &category, &date, &note)?;
    let (snapshot, mut store) = open(config)?;
    let expense = store
        .create_expense(&form)
        .with_context(|| format!("Could not add expense to '{}'", form.category))?;
    snapshot.write_expenses(&store)?;

    tracing::info!(id = ?expense.id, category = %expense.category, "expense added");
    println!(
        "Added {} to {} on {}",
        crate::format::format_currency(expense.amount),
        expense.category,
        expense.date.format("%Y-%m-%d")
    );
    Ok(())
}

fn cli_expenses(mut args: Vec<String>, config: &Config) -> Result<()> {
    let month = month_flag(&mut args)?;
    let (_, store) = open(config)?;
    let expenses = store.expenses().map_err(BudgetError::fetch("expenses"))?;
    print_lines(&report::expense_lines(month, &expenses));
    Ok(())
}

fn cli_edit_expense(mut args: Vec<String>, config: &Config) -> Result<()> {
    let patch = ExpensePatch {
        amount: take_flag(&mut args, "--amount")?.map(|a| parse_amount(&a)).transpose()?,
        category: take_flag(&mut args, "--category")?
            .map(|c| required_text(&c, "Category"))
            .transpose()?,
        date: take_flag(&mut args, "--date")?.map(|d| parse_date(&d)).transpose()?,
        description: take_flag(&mut args, "--note")?.and_then(|n| optional_text(&n)),
    };
    let id = record_id(
        &args,
        "edit-expense <id> [--amount X] [--category C] [--date D] [--note T]",
    )?;
    ensure_changes(patch.is_empty())?;

    let (snapshot, mut store) = open(config)?;
    let expense = store
        .update_expense(id, &patch)
        .map_err(BudgetError::write("expense"))?;
    snapshot.write_expenses(&store)?;

    tracing::info!(id, category = %expense.category, "expense updated");
    println!(
        "Updated expense {id}: {} in {} on {}",
        crate::format::format_currency(expense.amount),
        expense.category,
        expense.date.format("%Y-%m-%d")
    );
    Ok(())
}

fn cli_delete_expense(args: Vec<String>, config: &Config) -> Result<()> {
    let id = record_id(&args, "delete-expense <id>")?;
    let (snapshot, mut store) = open(config)?;
    store
        .delete_expense(id)
        .map_err(BudgetError::write("expense"))?;
    snapshot.write_expenses(&store)?;

    tracing::info!(id, "expense deleted");
    println!("Expense deleted.");
    Ok(())
}

fn frequency_flag(args: &mut Vec<String>) -> Result<Option<Frequency>> {
    match take_flag(args, "--recurring")? {
        Some(value) => match Frequency::parse(&value) {
            Some(frequency) => Ok(Some(frequency)),
            None => anyhow::bail!(
                "Unknown frequency '{value}', expected weekly, biweekly, monthly or yearly"
            ),
        },
        None => Ok(None),
    }
}

fn cli_incomes(config: &Config) -> Result<()> {
    let (_, store) = open(config)?;
    let incomes = store.incomes().map_err(BudgetError::fetch("incomes"))?;
    print_lines(&report::income_lines(&incomes));
    Ok(())
}

fn cli_add_income(mut args: Vec<String>, config: &Config) -> Result<()> {
    let date = take_flag(&mut args, "--date")?.unwrap_or_else(today);
    let note = take_flag(&mut args, "--note")?.unwrap_or_default();
    let frequency = frequency_flag(&mut args)?;
    let amount = args.first().cloned().unwrap_or_default();
    let source = args.get(1..).unwrap_or_default().join(" ");

    let mut form = NewIncome::parse(&source, &amount, &date, &note)?;
    if let Some(frequency) = frequency {
        form = form.recurring(frequency);
    }
    let (snapshot, mut store) = open(config)?;
    let income = store
        .create_income(&form)
        .map_err(BudgetError::write("income"))?;
    snapshot.write_incomes(&store)?;

    tracing::info!(id = ?income.id, source = %income.source, "income added");
    println!(
        "Added income {} from {} on {}",
        crate::format::format_currency(income.amount),
        income.source,
        income.date.format("%Y-%m-%d")
    );
    Ok(())
}

fn cli_edit_income(mut args: Vec<String>, config: &Config) -> Result<()> {
    let frequency = frequency_flag(&mut args)?;
    let one_off = take_switch(&mut args, "--one-off");
    if one_off && frequency.is_some() {
        anyhow::bail!("--recurring and --one-off cannot be combined");
    }
    let patch = IncomePatch {
        source: take_flag(&mut args, "--source")?
            .map(|s| required_text(&s, "Source"))
            .transpose()?,
        amount: take_flag(&mut args, "--amount")?.map(|a| parse_amount(&a)).transpose()?,
        date: take_flag(&mut args, "--date")?.map(|d| parse_date(&d)).transpose()?,
        is_recurring: if one_off { Some(false) } else { frequency.map(|_| true) },
        frequency,
        notes: take_flag(&mut args, "--note")?.and_then(|n| optional_text(&n)),
    };
    let id = record_id(
        &args,
        "edit-income <id> [--source S] [--amount X] [--date D] [--recurring F | --one-off] [--note T]",
    )?;
    ensure_changes(patch.is_empty())?;

    let (snapshot, mut store) = open(config)?;
    let income = store
        .update_income(id, &patch)
        .map_err(BudgetError::write("income"))?;
    snapshot.write_incomes(&store)?;

    tracing::info!(id, source = %income.source, "income updated");
    println!(
        "Updated income {id}: {} from {}",
        crate::format::format_currency(income.amount),
        income.source
    );
    Ok(())
}

fn cli_delete_income(args: Vec<String>, config: &Config) -> Result<()> {
    let id = record_id(&args, "delete-income <id>")?;
    let (snapshot, mut store) = open(config)?;
    store
        .delete_income(id)
        .map_err(BudgetError::write("income"))?;
    snapshot.write_incomes(&store)?;

    tracing::info!(id, "income deleted");
    println!("Income record deleted.");
    Ok(())
}

fn cli_wishlist(config: &Config) -> Result<()> {
    let (_, store) = open(config)?;
    let items = store.wishlist().map_err(BudgetError::fetch("wishlist"))?;
    print_lines(&report::wishlist_lines(&items));
    Ok(())
}

fn cli_add_wish(mut args: Vec<String>, config: &Config) -> Result<()> {
    let url = take_flag(&mut args, "--url")?.unwrap_or_default();
    let note = take_flag(&mut args, "--note")?.unwrap_or_default();
    let price = args.first().cloned().unwrap_or_default();
    let name = args.get(1..).unwrap_or_default().join(" ");

    let form = NewWishlistItem::parse(&name, &price, &url, &note)?;
    let (snapshot, mut store) = open(config)?;
    let item = store
        .create_wishlist_item(&form)
        .map_err(BudgetError::write("wishlist item"))?;
    snapshot.write_wishlist(&store)?;

    tracing::info!(id = ?item.id, "wishlist item added");
    println!(
        "Added {} ({}) to the wishlist",
        item.item_name,
        crate::format::format_currency(item.price)
    );
    Ok(())
}

fn cli_edit_wish(mut args: Vec<String>, config: &Config) -> Result<()> {
    let patch = WishlistPatch {
        item_name: take_flag(&mut args, "--name")?
            .map(|n| required_text(&n, "Item name"))
            .transpose()?,
        price: take_flag(&mut args, "--price")?.map(|p| parse_amount(&p)).transpose()?,
        url: take_flag(&mut args, "--url")?.and_then(|u| optional_text(&u)),
        notes: take_flag(&mut args, "--note")?.and_then(|n| optional_text(&n)),
    };
    let id = record_id(&args, "edit-wish <id> [--name N] [--price X] [--url U] [--note T]")?;
    ensure_changes(patch.is_empty())?;

    let (snapshot, mut store) = open(config)?;
    let item = store
        .update_wishlist_item(id, &patch)
        .map_err(BudgetError::write("wishlist item"))?;
    snapshot.write_wishlist(&store)?;

    tracing::info!(id, "wishlist item updated");
    println!(
        "Updated {}: {}",
        item.item_name,
        crate::format::format_currency(item.price)
    );
    Ok(())
}

fn cli_delete_wish(args: Vec<String>, config: &Config) -> Result<()> {
    let id = record_id(&args, "delete-wish <id>")?;
    let (snapshot, mut store) = open(config)?;
    store
        .delete_wishlist_item(id)
        .map_err(BudgetError::write("wishlist item"))?;
    snapshot.write_wishlist(&store)?;

    tracing::info!(id, "wishlist item deleted");
    println!("Wishlist item deleted.");
    Ok(())
}

fn cli_buy(mut args: Vec<String>, config: &Config) -> Result<()> {
    let date = parse_date(&take_flag(&mut args, "--date")?.unwrap_or_else(today))?;
    let category = take_flag(&mut args, "--category")?.unwrap_or_default();
    let id = record_id(&args, "buy <id> [--date YYYY-MM-DD] [--category NAME]")?;
    let purchase = Purchase::on(date).in_category(&category);

    let (snapshot, mut store) = open(config)?;
    let expense = store
        .purchase_wishlist_item(id, &purchase)
        .map_err(BudgetError::write("purchase"))?;
    snapshot.write_expenses(&store)?;
    snapshot.write_wishlist(&store)?;

    tracing::info!(id, expense_id = ?expense.id, category = %expense.category, "wishlist item purchased");
    println!("Item marked as purchased and added to expenses");
    println!(
        "{} in {} on {}: {}",
        crate::format::format_currency(expense.amount),
        expense.category,
        expense.date.format("%Y-%m-%d"),
        expense.description.as_deref().unwrap_or("")
    );
    Ok(())
}

fn cli_trend(config: &Config) -> Result<()> {
    let (_, store) = open(config)?;
    let today = chrono::Local::now().date_naive();
    let expenses = store.expenses().map_err(BudgetError::fetch("expenses"))?;
    let overview = DashboardOverview::compute(&expenses, &[], &[], &[], today);
    let stacked = stack_category_spend(&overview.monthly_category_spend);
    print_lines(&report::stacked_lines(&stacked));
    Ok(())
}

fn cli_summary(args: Vec<String>, config: &Config) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let as_of = match args.first().filter(|a| !a.starts_with('-')) {
        Some(value) => {
            let month: MonthKey = value.parse()?;
            month.last_day().min(today).max(month.first_day())
        }
        None => today,
    };

    let (_, store) = open(config)?;
    let overview = DashboardOverview::compute(
        &store.expenses().map_err(BudgetError::fetch("expenses"))?,
        &store.incomes().map_err(BudgetError::fetch("incomes"))?,
        &store.savings_history().map_err(BudgetError::fetch("savings"))?,
        &store.wishlist().map_err(BudgetError::fetch("wishlist"))?,
        as_of,
    );
    let savings = store
        .savings(overview.month)
        .map_err(BudgetError::fetch("savings"))?;
    print_lines(&report::overview_lines(&overview, savings.as_ref()));
    Ok(())
}

fn cli_categories(config: &Config) -> Result<()> {
    let (_, store) = open(config)?;
    let categories = store
        .categories()
        .map_err(BudgetError::fetch("categories"))?;
    print_lines(&report::category_lines(&categories));
    Ok(())
}

fn cli_add_category(mut args: Vec<String>, config: &Config) -> Result<()> {
    let icon = take_flag(&mut args, "--icon")?.unwrap_or_default();
    let color = take_flag(&mut args, "--color")?.unwrap_or_default();
    let name = required_text(&args.join(" "), "Category name")?;

    let (snapshot, mut store) = open(config)?;
    let category = store
        .create_category(&Category {
            icon,
            color,
            ..Category::new(name)
        })
        .map_err(BudgetError::write("category"))?;
    snapshot.write_categories(&store)?;

    tracing::info!(id = ?category.id, name = %category.name, "category added");
    println!("Added category {}", category.name);
    Ok(())
}

fn cli_delete_category(args: Vec<String>, config: &Config) -> Result<()> {
    let query = args.join(" ");
    if query.trim().is_empty() {
        anyhow::bail!("Usage: budget-tracker delete-category <id|name>");
    }

    let (snapshot, mut store) = open(config)?;
    let categories = store
        .categories()
        .map_err(BudgetError::fetch("categories"))?;
    let (id, name) = query
        .parse::<i64>()
        .ok()
        .and_then(|id| Category::find_by_id(&categories, id))
        .or_else(|| Category::find_by_name(&categories, &query))
        .and_then(|c| c.id.map(|id| (id, c.name.clone())))
        .ok_or_else(|| anyhow::anyhow!("Category '{query}' not found"))?;

    store
        .delete_category(id)
        .map_err(BudgetError::write("category"))?;
    snapshot.write_categories(&store)?;
    snapshot.write_budgets(&store)?;

    tracing::info!(id, name = %name, "category deleted");
    println!("Deleted category {name}.");
    Ok(())
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
