//! Sample data for `folio demo`.

use anyhow::Context;
use folio_store::RecordStore;
use serde::{Deserialize, Serialize};
use serde_json::Number;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub country: String,
    pub pincode: Number,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub age: Number,
    pub contact: String,
    pub company: String,
    pub address: Address,
}

/// What the demo did, for printing.
#[derive(Debug)]
pub struct DemoReport {
    pub written: usize,
    pub users: Vec<User>,
    pub deleted: String,
    pub remaining: usize,
}

pub fn employees() -> Vec<User> {
    [
        ("John", 30u64, "ABC"),
        ("Paul", 27, "Facebook"),
        ("Jessica", 22, "Google"),
        ("Akhil", 34, "Meta"),
        ("Alba", 42, "Amazon"),
        ("Stipe", 45, "Yandex"),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (name, age, company))| User {
        name: name.into(),
        age: Number::from(age),
        contact: "213".into(),
        company: company.into(),
        address: Address {
            street: format!("Street {}", i + 1),
            city: format!("City {}", i + 1),
            country: format!("Country {}", i + 1),
            pincode: Number::from(123456u64),
        },
    })
    .collect()
}

/// Write the sample users, read them all back, then delete John.
pub fn run(store: &RecordStore, collection: &str) -> anyhow::Result<DemoReport> {
    let employees = employees();
    for user in &employees {
        store
            .write(collection, &user.name, user)
            .with_context(|| format!("writing {}", user.name))?;
    }

    let users = store
        .read_all_as::<User>(collection)
        .context("reading users back")?;

    let deleted = "John".to_string();
    store
        .delete(collection, &deleted)
        .with_context(|| format!("deleting {deleted}"))?;
    let remaining = store.list(collection)?.len();

    Ok(DemoReport {
        written: employees.len(),
        users,
        deleted,
        remaining,
    })
}
