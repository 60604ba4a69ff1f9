use std::{error::Error, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use time::{Date, Month, OffsetDateTime};

use tally_rs::{
    account::{Account, NewAccount},
    category::stamp_category,
    client::{ApiClient, ClientError, DEFAULT_API_URL, FileSessionStore, LedgerApi},
    config::load_env,
    init_tracing,
    money::{format_currency, format_maybe_hidden},
    profile::ProfileUpdate,
    shell::{AppShell, Mode, MutationOutcome, ShellOptions},
    stats::{
        HiddenCategories, Period, cash_flow, category_breakdown, group_by_date,
        month_over_month, monthly_trend, net_worth,
    },
    timezone::parse_iso_date,
    transaction::{NewTransaction, TransactionKind},
};

/// A terminal client for a Tally server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The address of the Tally server.
    #[arg(long, env = "TALLY_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Where to keep the session between runs. Defaults to the config directory.
    #[arg(long)]
    session_file: Option<PathBuf>,

    /// Hide monetary amounts in the output.
    #[arg(long)]
    hide_amounts: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new user and log in.
    Register {
        #[arg(long)]
        email: String,
        /// Defaults to the part of the email before the '@'.
        #[arg(long)]
        name: Option<String>,
    },
    /// Log in with an email and password.
    Login {
        #[arg(long)]
        email: String,
    },
    /// Log out and forget the saved session.
    Logout,
    /// Show who is logged in.
    Me,
    /// Show the profile, or change it if any option is given.
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        avatar: Option<String>,
        #[arg(long)]
        membership: Option<String>,
    },
    /// Switch between Chinese and English.
    Language,
    /// List accounts with the totals of assets and liabilities.
    Accounts,
    /// Create an account.
    AddAccount {
        #[arg(long)]
        name: String,
        #[arg(long)]
        name_en: Option<String>,
        #[arg(long = "type")]
        account_type: Option<String>,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        balance: f64,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// List transactions by day.
    Transactions {
        #[command(flatten)]
        period: PeriodArgs,
    },
    /// Record an expense, or an income with `--income`.
    Add {
        amount: f64,
        #[arg(long)]
        income: bool,
        /// A built-in category ID or label, or any custom label.
        #[arg(long)]
        category: String,
        /// The name or ID of the account.
        #[arg(long)]
        account: Option<String>,
        /// The date as YYYY-MM-DD. Defaults to today.
        #[arg(long, value_parser = parse_iso_date)]
        date: Option<Date>,
        #[arg(long, default_value = "")]
        note: String,
    },
    /// Change a transaction.
    Edit {
        id: String,
        #[arg(long)]
        amount: Option<f64>,
        #[arg(long, conflicts_with = "expense")]
        income: bool,
        #[arg(long)]
        expense: bool,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        account: Option<String>,
        #[arg(long, value_parser = parse_iso_date)]
        date: Option<Date>,
        #[arg(long)]
        note: Option<String>,
    },
    /// Delete a transaction, or an account with `--account`.
    Delete {
        id: String,
        #[arg(long)]
        account: bool,
    },
    /// Show totals, the category breakdown and the monthly trend.
    Stats {
        #[command(flatten)]
        period: PeriodArgs,
        /// Summarise income instead of expenses.
        #[arg(long)]
        income: bool,
        /// Category labels to leave out of the percentages.
        #[arg(long)]
        hide: Vec<String>,
    },
}

#[derive(clap::Args, Debug)]
struct PeriodArgs {
    /// The year. Defaults to the current year.
    #[arg(long)]
    year: Option<i32>,
    /// The month, 1 to 12. Defaults to the current month.
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=12))]
    month: Option<u8>,
    /// Cover the whole year instead of one month.
    #[arg(long, conflicts_with = "month")]
    whole_year: bool,
}

impl PeriodArgs {
    fn resolve(&self, today: Date) -> Result<Period, Box<dyn Error>> {
        let year = self.year.unwrap_or(today.year());

        if self.whole_year {
            return Ok(Period::Year(year));
        }

        let month = match self.month {
            Some(month) => Month::try_from(month)?,
            None => today.month(),
        };

        Ok(Period::Month { year, month })
    }
}

type Shell = AppShell<ApiClient>;

#[tokio::main]
async fn main() -> ExitCode {
    load_env();
    init_tracing("warn");

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let sessions = match args.session_file {
        Some(path) => FileSessionStore::new(path),
        None => FileSessionStore::in_config_dir()?,
    };
    let api = ApiClient::new(&args.api_url, sessions);

    match args.command {
        Command::Register { email, name } => {
            let password = rpassword::prompt_password("Password: ")?;
            let mut shell = AppShell::new(api, ShellOptions::default());
            match shell.register(&email, &password, name.as_deref()).await? {
                Mode::Ready => println!("已注册 / Registered {email}"),
                _ => println!("请查收确认邮件 / Check your email to confirm the registration"),
            }
        }
        Command::Login { email } => {
            let password = rpassword::prompt_password("Password: ")?;
            let mut shell = AppShell::new(api, ShellOptions::default());
            match shell.log_in(&email, &password).await? {
                Mode::Ready => println!("已登录 / Logged in as {email}"),
                _ => return Err("登录失败 / Log in failed".into()),
            }
        }
        Command::Logout => match api.sessions().load()? {
            Some(session) => {
                if let Err(error) = api.log_out(&session).await {
                    tracing::warn!("The server could not log out the session: {error}");
                }
                println!("已登出 / Logged out");
            }
            None => println!("{}", ClientError::NotLoggedIn),
        },
        command => {
            let mut shell = AppShell::new(api, ShellOptions::default());
            if shell.resume().await? != Mode::Ready {
                return Err(ClientError::NotLoggedIn.into());
            }
            if args.hide_amounts {
                shell.toggle_amount_visibility();
            }

            run_logged_in(&mut shell, command).await?;
        }
    }

    Ok(())
}

async fn run_logged_in(shell: &mut Shell, command: Command) -> Result<(), Box<dyn Error>> {
    let language = shell.language();
    let today = OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date();

    match command {
        Command::Me => {
            let session = shell.session().ok_or(ClientError::NotLoggedIn)?;
            let user = shell.api().current_user(session).await?;
            println!("{} ({})", user.email, user.id);
        }
        Command::Profile {
            name,
            avatar,
            membership,
        } => {
            let update = ProfileUpdate {
                name,
                avatar,
                membership,
                language: None,
            };
            if !update.is_empty() {
                saved(shell.update_profile(update).await)?;
            }
            if let Some(profile) = shell.profile() {
                println!("{}: {}", language.pick("昵称", "Name"), profile.name);
                println!("{}: {}", language.pick("会员", "Membership"), profile.membership);
                println!("{}: {}", language.pick("头像", "Avatar"), profile.avatar);
                println!(
                    "{}: {}",
                    language.pick("语言", "Language"),
                    language.pick("中文", "English")
                );
            }
        }
        Command::Language => {
            saved(shell.toggle_language().await)?;
            println!("{}", shell.language().pick("已切换到中文", "Switched to English"));
        }
        Command::Accounts => print_accounts(shell),
        Command::AddAccount {
            name,
            name_en,
            account_type,
            balance,
            icon,
            color,
            description,
            status,
        } => {
            let mut account = NewAccount::named(&name);
            account.balance = balance;
            if let Some(name_en) = name_en {
                account.name_en = name_en;
            }
            if let Some(account_type) = account_type {
                account.account_type = account_type;
            }
            if let Some(icon) = icon {
                account.icon = icon;
            }
            if let Some(color) = color {
                account.color = color;
            }
            if let Some(description) = description {
                account.description = description;
            }
            if let Some(status) = status {
                account.status = status;
            }

            saved(shell.add_account(account).await)?;
            print_accounts(shell);
        }
        Command::Transactions { period } => {
            let period = period.resolve(today)?;
            print_transactions(shell, period);
        }
        Command::Add {
            amount,
            income,
            category,
            account,
            date,
            note,
        } => {
            let stamp = stamp_category(&category, language);
            let (account, account_id) = match account {
                Some(key) => match find_account(shell.accounts(), &key) {
                    Some(found) => (
                        found.display_name(language).to_owned(),
                        Some(found.id.clone()),
                    ),
                    None => (key, None),
                },
                None => (String::new(), None),
            };

            let transaction = NewTransaction {
                kind: if income {
                    TransactionKind::Income
                } else {
                    TransactionKind::Expense
                },
                amount,
                category: stamp.label,
                category_icon: stamp.icon,
                category_color: stamp.color,
                date: date.unwrap_or(today),
                account,
                account_id,
                note,
            };

            saved(shell.add_transaction(transaction).await)?;
            if let Some(created) = shell.transactions().first() {
                println!("{} {}", language.pick("已记录", "Recorded"), created.id);
            }
        }
        Command::Edit {
            id,
            amount,
            income,
            expense,
            category,
            account,
            date,
            note,
        } => {
            let mut transaction = shell
                .transactions()
                .iter()
                .find(|transaction| transaction.id == id)
                .cloned()
                .ok_or("记录不存在 / Record not found")?;

            if let Some(amount) = amount {
                transaction.amount = amount;
            }
            if income {
                transaction.kind = TransactionKind::Income;
            } else if expense {
                transaction.kind = TransactionKind::Expense;
            }
            if let Some(category) = category {
                let stamp = stamp_category(&category, language);
                transaction.category = stamp.label;
                transaction.category_icon = stamp.icon;
                transaction.category_color = stamp.color;
            }
            if let Some(key) = account {
                match find_account(shell.accounts(), &key) {
                    Some(found) => {
                        transaction.account = found.display_name(language).to_owned();
                        transaction.account_id = Some(found.id.clone());
                    }
                    None => {
                        transaction.account = key;
                        transaction.account_id = None;
                    }
                }
            }
            if let Some(date) = date {
                transaction.date = date;
                transaction.time = date;
            }
            if let Some(note) = note {
                transaction.note = note;
            }

            saved(shell.update_transaction(transaction).await)?;
            println!("{} {id}", language.pick("已更新", "Updated"));
        }
        Command::Delete { id, account } => {
            let outcome = if account {
                shell.delete_account(&id).await
            } else {
                shell.delete_transaction(&id).await
            };
            saved(outcome)?;
            println!("{} {id}", language.pick("已删除", "Deleted"));
        }
        Command::Stats {
            period,
            income,
            hide,
        } => {
            let period = period.resolve(today)?;
            let kind = if income {
                TransactionKind::Income
            } else {
                TransactionKind::Expense
            };
            let mut hidden = HiddenCategories::default();
            for label in &hide {
                hidden.toggle(label);
            }
            print_stats(shell, period, kind, &hidden);
        }
        Command::Register { .. } | Command::Login { .. } | Command::Logout => {}
    }

    Ok(())
}

/// Turn anything but a saved mutation into an error.
///
/// Changes that were only applied locally are lost when the program exits.
fn saved(outcome: MutationOutcome) -> Result<(), ClientError> {
    match outcome {
        MutationOutcome::Saved => Ok(()),
        MutationOutcome::LocalOnly(error) | MutationOutcome::Failed(error) => Err(error),
    }
}

fn find_account<'a>(accounts: &'a [Account], key: &str) -> Option<&'a Account> {
    accounts
        .iter()
        .find(|account| account.id == key || account.name == key || account.name_en == key)
}

fn print_accounts(shell: &Shell) {
    let language = shell.language();
    let visible = shell.amounts_visible();

    for account in shell.accounts() {
        println!(
            "{:<20} {:<12} {:>16}  {}  [{}]",
            account.display_name(language),
            account.account_type,
            format_maybe_hidden(account.balance, visible),
            account.status,
            account.id
        );
    }

    let worth = net_worth(shell.accounts());
    println!();
    println!(
        "{}: {}  {}: {}  {}: {}",
        language.pick("资产", "Assets"),
        format_maybe_hidden(worth.assets, visible),
        language.pick("负债", "Liabilities"),
        format_maybe_hidden(worth.liabilities, visible),
        language.pick("净资产", "Net worth"),
        format_maybe_hidden(worth.total, visible),
    );
}

fn print_transactions(shell: &Shell, period: Period) {
    let language = shell.language();
    let visible = shell.amounts_visible();
    let in_period: Vec<_> = shell
        .transactions()
        .iter()
        .filter(|transaction| period.contains(transaction.time))
        .cloned()
        .collect();

    let flow = cash_flow(&in_period, None);
    println!(
        "{period}  {}: {}  {}: {}",
        language.pick("支出", "Expense"),
        format_maybe_hidden(flow.expense, visible),
        language.pick("收入", "Income"),
        format_maybe_hidden(flow.income, visible),
    );

    for (date, transactions) in group_by_date(&in_period) {
        println!();
        println!("{date}");
        for transaction in transactions {
            println!(
                "  {:<12} {:>14}  {:<12} {}  [{}]",
                transaction.category,
                format_maybe_hidden(transaction.kind.signed(transaction.amount), visible),
                transaction.account,
                transaction.note,
                transaction.id
            );
        }
    }
}

fn print_stats(shell: &Shell, period: Period, kind: TransactionKind, hidden: &HiddenCategories) {
    let language = shell.language();
    let transactions = shell.transactions();
    let breakdown = category_breakdown(transactions, period, kind, hidden);
    let kind_label = match kind {
        TransactionKind::Expense => language.pick("支出", "Expense"),
        TransactionKind::Income => language.pick("收入", "Income"),
    };

    println!(
        "{period}  {kind_label}: {}",
        format_currency(breakdown.total)
    );
    println!(
        "{}: {:.1}",
        language.pick("日均", "Daily average"),
        breakdown.average_per_day()
    );
    if let Period::Month { year, month } = period {
        println!(
            "{}: {:+.1}%",
            language.pick("环比", "Month over month"),
            month_over_month(transactions, year, month, kind)
        );
    }

    println!();
    for share in &breakdown.shares {
        let marker = if share.hidden { "-" } else { "*" };
        println!(
            "{marker} {:<12} {:>3}%  {}",
            share.label,
            share.percent,
            format_currency(share.amount)
        );
    }

    println!();
    let trend = monthly_trend(transactions, period.year(), kind);
    for (index, amount) in trend.totals.iter().enumerate() {
        let bar = "#".repeat((amount / trend.max * 30.0).round() as usize);
        println!("{:>2} {:<30} {}", index + 1, bar, format_currency(*amount));
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use time::{Month, macros::date};

    use super::{Args, PeriodArgs};
    use tally_rs::stats::Period;

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn period_defaults_to_current_month() {
        let args = PeriodArgs {
            year: None,
            month: None,
            whole_year: false,
        };

        assert_eq!(
            args.resolve(date!(2026 - 03 - 09)).unwrap(),
            Period::Month {
                year: 2026,
                month: Month::March
            }
        );
    }

    #[test]
    fn whole_year_ignores_month() {
        let args = PeriodArgs {
            year: Some(2025),
            month: None,
            whole_year: true,
        };

        assert_eq!(args.resolve(date!(2026 - 03 - 09)).unwrap(), Period::Year(2025));
    }
}
