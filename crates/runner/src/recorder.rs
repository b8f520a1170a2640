//! Tick recorder strategy
//!
//! Subscribes to one instrument once the gateway is ready and journals every
//! top-of-book and last trade update to a CSV file.

use chrono::{SecondsFormat, Utc};
use fixgate_core::{Instrument, OrderIntent, Price, Quantity, SessionId, Side};
use fixgate_gateway::{Diagnostic, GatewayError, Strategy, TradingIntents};
use log::{error, info, warn};
use std::fs::{File, OpenOptions};
use std::path::Path;

/// Append-only CSV journal of market data ticks
pub struct TickJournal {
    writer: csv::Writer<File>,
}

impl TickJournal {
    /// Open `path` for appending, writing the header row if the file is new
    pub fn create(path: impl AsRef<Path>) -> Result<Self, csv::Error> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let fresh = path.metadata().map(|m| m.len() == 0).unwrap_or(true);
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if fresh {
            writer.write_record(["time", "kind", "qty", "px"])?;
            writer.flush()?;
        }

        Ok(Self { writer })
    }

    /// Append one tick stamped with the current UTC time
    pub fn record(&mut self, kind: &str, quantity: Quantity, price: Price) -> Result<(), csv::Error> {
        let time = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        self.writer
            .write_record([time, kind.to_string(), quantity.to_string(), price.to_string()])?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Records ticks for one instrument; optionally sends a single probe
/// market order on the first last-trade update.
pub struct TickRecorder {
    instrument: Instrument,
    account: String,
    journal: TickJournal,
    probe_quantity: Option<Quantity>,
    probe_sent: bool,
}

impl TickRecorder {
    pub fn new(instrument: Instrument, account: impl Into<String>, journal: TickJournal) -> Self {
        Self {
            instrument,
            account: account.into(),
            journal,
            probe_quantity: None,
            probe_sent: false,
        }
    }

    pub fn with_probe_order(mut self, quantity: Quantity) -> Self {
        self.probe_quantity = Some(quantity);
        self
    }

    fn tick(&mut self, kind: &str, quantity: Quantity, price: Price) {
        info!("MarketDataUpdate: {} {} / {}", kind, price, quantity);
        if let Err(e) = self.journal.record(kind, quantity, price) {
            error!("Failed to journal {} tick: {}", kind, e);
        }
    }
}

impl Strategy for TickRecorder {
    fn name(&self) -> &str {
        "tick-recorder"
    }

    fn on_ready(&mut self, gateway: &dyn TradingIntents) -> Result<(), GatewayError> {
        gateway.subscribe_market_data(&self.instrument)?;
        Ok(())
    }

    fn on_best_bid_update(&mut self, _gateway: &dyn TradingIntents, quantity: Quantity, price: Price) {
        self.tick("BID", quantity, price);
    }

    fn on_best_offer_update(
        &mut self,
        _gateway: &dyn TradingIntents,
        quantity: Quantity,
        price: Price,
    ) {
        self.tick("OFFER", quantity, price);
    }

    fn on_last_trade_update(
        &mut self,
        gateway: &dyn TradingIntents,
        quantity: Quantity,
        price: Price,
    ) {
        self.tick("LAST_TRADE", quantity, price);

        let Some(probe) = self.probe_quantity.filter(|_| !self.probe_sent) else {
            return;
        };
        self.probe_sent = true;
        let intent = OrderIntent::buy(self.instrument.clone(), self.account.clone(), probe);
        if let Err(e) = gateway.send_market_order(intent) {
            error!("Probe order failed: {}", e);
        }
    }

    fn on_order_fill(
        &mut self,
        _gateway: &dyn TradingIntents,
        side: Side,
        quantity: Quantity,
        price: Price,
    ) {
        info!("Position change: {} {} @ {}", side, quantity, price);
    }

    fn on_order_reject(&mut self, _gateway: &dyn TradingIntents, side: Side, quantity: Quantity) {
        warn!("Order rejected: {} {}", side, quantity);
    }

    fn on_session_logout(&mut self, session: &SessionId) {
        warn!("Session {} logged out while trading", session);
    }

    fn on_diagnostic(&mut self, diagnostic: &Diagnostic) {
        warn!("Ignored inbound data: {}", diagnostic);
    }
}
