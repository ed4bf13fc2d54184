//! Renderers for the simulation event stream.

use std::io::Write;

use twin_core::telemetry::{EventSink, TwinEvent};

/// Formats one event as a log line stamped with simulation minutes.
pub fn render_text(event: &TwinEvent) -> String {
    let at = event.minutes();
    match event {
        TwinEvent::VehicleStarted { vehicle, soc, .. } => format!(
            "--- [{at:.1}min] {vehicle} starting (battery: {:.1}%) ---",
            soc * 100.0
        ),
        TwinEvent::StepUpdate {
            vehicle,
            soc,
            speed_kmh,
            mode,
            ..
        } => format!(
            "   [{at:5.1}m] {vehicle} | Bat: {:4.1}% | Speed: {speed_kmh:3.0} km/h | Mode: {}",
            soc * 100.0,
            mode.as_str().to_uppercase()
        ),
        TwinEvent::Stranded {
            vehicle,
            distance_km,
            ..
        } => format!("[{at:.1}min] {vehicle} out of battery at km {distance_km:.1}!"),
        TwinEvent::Arrived { vehicle, soc, .. } => format!(
            "[{at:.1}min] {vehicle} arrived at destination. Final battery: {:.1}%",
            soc * 100.0
        ),
        TwinEvent::ChargingStarted {
            vehicle,
            energy_kwh,
            duration_minutes,
            ..
        } => format!(
            "[{at:.1}min] {vehicle} charging {energy_kwh:.1} kWh ({duration_minutes:.1} min)..."
        ),
        TwinEvent::ChargingCompleted { vehicle, .. } => {
            format!("[{at:.1}min] {vehicle} charge complete. Unplugging.")
        }
    }
}

/// Writes either text lines or JSON lines to `out`. Write failures are
/// remembered and reported once the run ends.
pub struct WriterSink<W: Write> {
    out: W,
    json: bool,
    error: Option<std::io::Error>,
}

impl<W: Write> WriterSink<W> {
    pub fn text(out: W) -> Self {
        Self {
            out,
            json: false,
            error: None,
        }
    }

    pub fn json(out: W) -> Self {
        Self {
            out,
            json: true,
            error: None,
        }
    }

    pub fn finish(mut self) -> std::io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn write_event(&mut self, event: &TwinEvent) -> std::io::Result<()> {
        if self.json {
            serde_json::to_writer(&mut self.out, event)?;
            writeln!(self.out)
        } else {
            writeln!(self.out, "{}", render_text(event))
        }
    }
}

impl<W: Write> EventSink for WriterSink<W> {
    fn emit(&mut self, event: &TwinEvent) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.write_event(event) {
            self.error = Some(err);
        }
    }
}
