/// claims and fees - claim accrued yield with a protocol fee
use chrono::{Duration, TimeZone, Utc};
use yield_stream_rs::{
    EngineConfig, InMemoryLedger, InMemoryScheduleStore, Money, Rate, RateTier, SafeTimeProvider,
    TimeSource, TokenLedger, Uuid, YieldEngine, YieldError,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== claims and fees example ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();

    // 0.5% of every claim goes to the treasury
    let treasury = Uuid::new_v4();
    let config = EngineConfig::with_fee(Rate::from_bps(50), treasury);
    println!("config:\n{}\n", config.to_json_pretty()?);

    let schedules = InMemoryScheduleStore::with_default_rate(vec![RateTier::unbounded(Rate::from_bps(10))])?;
    let ledger = InMemoryLedger::with_reserve(Money::from_units(10_000_000_000));
    let mut engine = YieldEngine::new(config, ledger, schedules, &time)?;

    let holder = Uuid::new_v4();
    engine.ledger_mut().set_balance(holder, Money::from_units(500_000_000));
    engine.on_balance_change(holder)?;

    // too early: nothing worth claiming yet
    controller.advance(Duration::hours(6));
    match engine.claim(holder, Money::from_units(1_000_000)) {
        Err(YieldError::InsufficientYieldBalance { available, requested }) => {
            println!("claim of {} rejected, only {} available", requested, available);
        }
        other => println!("unexpected: {:?}", other),
    }

    controller.advance(Duration::days(30));
    let preview = engine.get_claim_preview(holder, engine.now())?;
    println!("\nclaim preview after 30 days:");
    println!("  claimable: {}", preview.claimable);
    println!("  fee:       {}", preview.fee);
    println!("  net:       {}", preview.net_amount);
    println!("  left live: {}", preview.live_after_claim);

    let receipt = engine.claim(holder, preview.claimable)?;
    println!("\nclaimed {} (fee {}, net {})", receipt.amount, receipt.fee, receipt.net_amount);
    println!("holder balance:   {}", engine.ledger().balance_of(holder));
    println!("treasury balance: {}", engine.ledger().balance_of(treasury));

    println!("\nevents:");
    for event in engine.take_events() {
        println!("  {:?}", event);
    }

    Ok(())
}
