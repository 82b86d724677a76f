use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use taskstreak::chart::weekly_completions;
use taskstreak::schedule::DailyCheck;
use taskstreak::{Category, Clock, FileStore, Filter, ManualClock, MemoryStore, Streak, TodoList};

fn at(d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, d, h, 0, 0).unwrap()
}

fn add(list: &mut TodoList, text: &str) -> String {
    list.add_task(text, None, Category::Other)
        .unwrap()
        .unwrap()
        .id
        .clone()
}

#[test]
fn test_completions_then_midnight_check() -> anyhow::Result<()> {
    let clock = ManualClock::utc(at(9, 8));
    let store = MemoryStore::new();
    let mut list = TodoList::load(Box::new(store.clone()), Box::new(clock.clone()), false)?;
    let mut daily = DailyCheck::arm(&clock);

    // day 9: first completion does not count, nor does a second one
    let a = add(&mut list, "Plan sprint");
    list.toggle_complete(&a)?;
    clock.set(at(9, 15));
    let b = add(&mut list, "Review PRs");
    list.toggle_complete(&b)?;
    assert_eq!(list.streak().count, 0);
    assert!(!daily.poll(clock.now()));

    // day 10, before any boundary check: consecutive day
    clock.set(at(10, 7));
    let c = add(&mut list, "Write notes");
    list.toggle_complete(&c)?;
    assert_eq!(list.streak().count, 1);
    assert_eq!(list.streak().last_completed, Some(at(10, 7)));

    // midnight into day 11: nothing done today yet, streak resets
    clock.set(at(11, 0));
    assert!(daily.poll(clock.now()));
    assert!(list.check_daily_boundary()?);
    assert_eq!(list.streak(), Streak::default());
    assert_eq!(daily.next_due(), at(12, 0));

    clock.set(at(11, 10));
    let d = add(&mut list, "Ship it");
    list.toggle_complete(&d)?;
    assert_eq!(list.streak().count, 0);

    let chart = weekly_completions(list.tasks(), &clock);
    let counts: Vec<u64> = chart.iter().map(|d| d.completed).collect();
    assert_eq!(counts, vec![0, 0, 0, 0, 2, 1, 1]);

    assert!(list.filtered(Filter::Active).is_empty());
    assert_eq!(list.filtered(Filter::Completed).len(), 4);

    let saved: Vec<taskstreak::Task> = serde_json::from_str(&store.raw("tasks").unwrap())?;
    assert_eq!(saved.len(), 4);
    Ok(())
}

#[test]
fn test_state_survives_restart_on_disk() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let clock = ManualClock::utc(at(10, 9));

    {
        let mut list = TodoList::load(
            Box::new(FileStore::new(temp.path())),
            Box::new(clock.clone()),
            false,
        )?;
        let due = NaiveDate::from_ymd_opt(2026, 3, 14);
        list.add_task("Book dentist", due, Category::Health)?;
        let id = add(&mut list, "Call mum");
        list.toggle_complete(&id)?;
        list.reorder(1, Some(0))?;
    }

    clock.set(at(10, 20));
    let list = TodoList::load(
        Box::new(FileStore::new(temp.path())),
        Box::new(clock.clone()),
        false,
    )?;
    let texts: Vec<&str> = list.tasks().iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["Call mum", "Book dentist"]);
    assert!(list.tasks()[0].completed);
    assert_eq!(list.tasks()[1].category, Category::Health);
    assert_eq!(list.streak().last_completed, Some(at(10, 9)));

    let raw = std::fs::read_to_string(temp.path().join("streak.json"))?;
    let json: serde_json::Value = serde_json::from_str(&raw)?;
    assert_eq!(json["count"], 0);
    assert!(json["lastCompleted"].is_string());
    Ok(())
}

#[test]
fn test_streak_follows_local_calendar() -> anyhow::Result<()> {
    // UTC-8: 06:00 UTC on the 10th is 22:00 on the 9th locally
    let offset = FixedOffset::west_opt(8 * 3600).unwrap();
    let clock = ManualClock::new(at(10, 6), offset);
    let mut list = TodoList::load(
        Box::new(MemoryStore::new()),
        Box::new(clock.clone()),
        false,
    )?;

    let a = add(&mut list, "a");
    list.toggle_complete(&a)?; // local 9th, 22:00

    clock.advance(Duration::hours(24)); // local 10th, 22:00
    let b = add(&mut list, "b");
    list.toggle_complete(&b)?;
    assert_eq!(list.streak().count, 1);

    clock.advance(Duration::hours(3)); // local 11th, 01:00
    let c = add(&mut list, "c");
    list.toggle_complete(&c)?;
    assert_eq!(list.streak().count, 2);
    Ok(())
}
