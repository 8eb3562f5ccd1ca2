use rand::Rng;
use serde_json::{Value, json};
use std::fs::File;
use std::io::Error;
use std::path::Path;

/// Writes a ledger with one group of `members` members (ids `1..=members`)
/// and `payments` random payments. Every member is listed in the directory.
pub fn generate_ledger(path: &Path, members: u64, payments: usize) -> Result<(), Error> {
    let mut rng = rand::thread_rng();

    let users: Vec<Value> = (1..=members)
        .map(|id| json!({ "id": id, "name": format!("user{}", id) }))
        .collect();

    let payments: Vec<Value> = (1..=payments)
        .map(|n| {
            let co_payer_count = rng.gen_range(1..=members.min(4));
            let mut co_payers: Vec<u64> = Vec::new();
            while (co_payers.len() as u64) < co_payer_count {
                let id = rng.gen_range(1..=members);
                if !co_payers.contains(&id) {
                    co_payers.push(id);
                }
            }
            let creator = co_payers[0];
            let cents: u64 = rng.gen_range(1..=1_000_000);
            json!({
                "description": format!("payment {}", n),
                "price": format!("{}.{:02}", cents / 100, cents % 100),
                "co_payers": co_payers,
                "creator": creator,
            })
        })
        .collect();

    let ledger = json!({
        "users": users,
        "groups": [{
            "name": "Generated",
            "currency": "USD",
            "members": (1..=members).collect::<Vec<u64>>(),
            "payments": payments,
        }],
    });

    let file = File::create(path)?;
    serde_json::to_writer(file, &ledger)?;
    Ok(())
}
