pub mod activity;
pub mod availability;
pub mod booking;
pub mod health;
pub mod schedule;
pub mod time_slot;

// ハンドラで使う現在時刻。マーケットプレイスのローカル時刻で扱う
pub(crate) fn now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}
