#![allow(dead_code)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

const SQL_TIME_FMT: &str = "%Y-%m-%d %H:%M:%S%#z";

pub fn parse_time(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_str(s, SQL_TIME_FMT)
        .expect("Invalid time format in test helper")
        .with_timezone(&Utc)
}

fn id(s: &str) -> Uuid {
    Uuid::parse_str(s).expect("Invalid seed id")
}

pub fn seed_admin_id() -> Uuid {
    id("00000000-0000-0000-0000-000000000000")
}

pub fn seed_member_user_id() -> Uuid {
    id("00000000-0000-0000-0000-000000000001")
}

pub const SEED_ADMIN_EMAIL: &str = "admin@test.com";
pub const SEED_MEMBER_EMAIL: &str = "member@test.com";

pub fn seed_alice_id() -> Uuid {
    id("00000000-0000-0000-0000-0000000000a0")
}

pub fn seed_bob_id() -> Uuid {
    id("00000000-0000-0000-0000-0000000000a1")
}

/// Alice: $10.00 + $25.00, Bob: $5.00
pub const SEED_ALICE_TOTAL: i64 = 3500;
pub const SEED_BOB_TOTAL: i64 = 500;

pub fn seed_sermon_with_image_id() -> Uuid {
    id("00000000-0000-0000-0000-0000000000b1")
}

pub fn seed_past_event_id() -> Uuid {
    id("00000000-0000-0000-0000-0000000000c2")
}

pub fn seed_post_id() -> Uuid {
    id("00000000-0000-0000-0000-0000000000d0")
}

pub fn nonexisting_id() -> Uuid {
    id("00000000-0000-0000-0000-00000000ffff")
}
