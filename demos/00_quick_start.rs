/// quick start - track one holder and read its yield
use yield_stream_rs::{
    EngineConfig, InMemoryLedger, InMemoryScheduleStore, Money, Rate, RateTier, SafeTimeProvider,
    TimeSource, Uuid, YieldEngine,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 0.05% a day on everything
    let schedules = InMemoryScheduleStore::with_default_rate(vec![RateTier::unbounded(Rate::from_bps(5))])?;
    let ledger = InMemoryLedger::with_reserve(Money::from_units(1_000_000_000));
    let time = SafeTimeProvider::new(TimeSource::System);
    let mut engine = YieldEngine::new(EngineConfig::standard(), ledger, schedules, &time)?;

    // a holder receives 1,000 tokens (6 decimals)
    let holder = Uuid::new_v4();
    engine.ledger_mut().set_balance(holder, Money::from_units(1_000_000_000));
    engine.on_balance_change(holder)?;

    // project a week ahead
    let preview = engine.get_accrue_preview(holder, engine.now() + 7 * 86_400)?;
    println!("{}", preview.to_json_pretty()?);

    Ok(())
}
