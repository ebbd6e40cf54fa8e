/// rate changes - tiered rates that change over time
use chrono::{Duration, TimeZone, Utc};
use rust_decimal_macros::dec;
use yield_stream_rs::types::day_index;
use yield_stream_rs::{
    EngineConfig, InMemoryLedger, InMemoryScheduleStore, Money, Rate, RateTier, SafeTimeProvider,
    TimeSource, Uuid, YieldEngine, YieldRate, DEFAULT_GROUP,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== rate changes example ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();

    // first 10,000 tokens earn more than anything above
    let cap = Money::from_decimal(dec!(10000), 6)?;
    let launch = vec![
        RateTier::new(Rate::from_decimal(dec!(0.0003))?, cap),
        RateTier::unbounded(Rate::from_decimal(dec!(0.0001))?),
    ];
    let schedules = InMemoryScheduleStore::with_default_rate(launch)?;
    let ledger = InMemoryLedger::with_reserve(Money::from_decimal(dec!(1000000), 6)?);
    let mut engine = YieldEngine::new(EngineConfig::standard(), ledger, schedules, &time)?;

    let holder = Uuid::new_v4();
    engine.ledger_mut().set_balance(holder, Money::from_decimal(dec!(25000), 6)?);
    engine.on_balance_change(holder)?;
    println!("holder funded on {}", time.now().format("%Y-%m-%d"));

    // rates drop in ten days
    let cut_day = day_index(engine.now()) + 10;
    engine.schedules_mut().add_rate(
        DEFAULT_GROUP,
        YieldRate::new(cut_day, vec![RateTier::unbounded(Rate::from_decimal(dec!(0.00005))?)]),
    )?;
    println!("rate cut scheduled for day {}", cut_day);

    // half a day in, the yield is still streaming
    controller.advance(Duration::hours(12));
    let accrual = engine.commit(holder)?;
    println!(
        "\nafter 12h: settled {} live {}",
        accrual.settled_after.to_decimal(6),
        accrual.live_after.to_decimal(6)
    );

    // run across the rate change
    controller.advance(Duration::days(20));
    let accrual = engine.commit(holder)?;
    println!(
        "after 20 more days ({} schedule entries): settled {} live {}",
        accrual.rates.len(),
        accrual.settled_after.to_decimal(6),
        accrual.live_after.to_decimal(6)
    );

    println!("\n{}", accrual.to_json_pretty()?);

    Ok(())
}
