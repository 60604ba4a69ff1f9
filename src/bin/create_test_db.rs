use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use time::macros::date;

use tally_rs::{
    account::NewAccountRow,
    store::{RemoteStore, SignUp, SqliteStore, UserClient},
    transaction::{NewTransactionRow, TransactionKind},
};

/// A utility for creating a demo database for the Tally server's `--db-path` option.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The email address of the demo user.
    #[arg(long, default_value = "demo@example.com")]
    email: String,

    /// The password of the demo user.
    #[arg(long, default_value = "password")]
    password: String,
}

/// Create and populate a database for manual testing.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let store = SqliteStore::open(output_path)?;

    println!("Creating demo user {}...", args.email);
    let response = store
        .sign_up(&SignUp {
            email: args.email.clone(),
            password: args.password.clone(),
            name: "Demo".to_owned(),
        })
        .await?;
    let user_id = response.user.id;
    let session = response.session.ok_or("the store did not issue a session")?;
    let client = store.with_token(&session.access_token);

    println!("Creating accounts...");
    let accounts = [
        ("现金", "Cash", "Wallet", 5200.0, "payments", "#10b981", "个人零钱、备用金", ""),
        ("招商银行", "Bank", "Savings", 86400.0, "credit_card", "#137fec", "工资卡 (**** 8829)", "储蓄卡"),
        ("支付宝", "Alipay", "Digital", 24150.0, "account_balance_wallet", "#0ea5e9", "余额宝 & 余额", "收益中"),
        ("微信支付", "WeChat", "Digital", 12750.0, "chat_bubble", "#22c55e", "零钱通收益", "常用"),
    ];
    for (name, name_en, account_type, balance, icon, color, description, status) in accounts {
        client
            .insert_account(&NewAccountRow {
                user_id: user_id.clone(),
                name: name.to_owned(),
                name_en: name_en.to_owned(),
                account_type: account_type.to_owned(),
                balance,
                icon: icon.to_owned(),
                color: color.to_owned(),
                description: description.to_owned(),
                status: status.to_owned(),
            })
            .await?;
    }

    println!("Creating transactions...");
    let transactions = [
        (TransactionKind::Expense, 85.2, "餐饮", "restaurant", "#fb923c", date!(2026 - 02 - 26), "招商银行", "晚餐"),
        (TransactionKind::Income, 500.0, "餐饮", "restaurant", "#fb923c", date!(2026 - 02 - 27), "微信支付", "退款"),
        (TransactionKind::Income, 4200.0, "薪资转帐", "payments", "#10b981", date!(2026 - 02 - 21), "招商银行", "2月工资"),
        (TransactionKind::Expense, 1240.0, "住房物业", "home", "#4f46e5", date!(2026 - 02 - 23), "支付宝", "房租"),
    ];
    for (kind, amount, category, icon, color, date, account, note) in transactions {
        client
            .insert_transaction(&NewTransactionRow {
                user_id: user_id.clone(),
                kind,
                amount,
                category: category.to_owned(),
                category_icon: icon.to_owned(),
                category_color: color.to_owned(),
                date,
                account: account.to_owned(),
                account_id: None,
                note: note.to_owned(),
            })
            .await?;
    }

    println!("Success! Log in as {} with the password \"{}\".", args.email, args.password);

    Ok(())
}
