//! Recording mocks for host tests

use std::cell::RefCell;
use std::rc::Rc;

use ledmux_hal::{OutputPin, TickSource};

use crate::panel::PanelPins;

/// Panel line identity for trace entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Mux0,
    Mux1,
    Mux2,
    Enable,
    Red,
    Green,
    Latch,
    Shift,
}

/// Every pin edge in the order it was driven
pub type Trace = Rc<RefCell<Vec<(Line, bool)>>>;

/// Output pin that appends each write to a shared trace
pub struct TracePin {
    line: Line,
    trace: Trace,
    high: bool,
}

impl OutputPin for TracePin {
    fn set_high(&mut self) {
        self.high = true;
        self.trace.borrow_mut().push((self.line, true));
    }

    fn set_low(&mut self) {
        self.high = false;
        self.trace.borrow_mut().push((self.line, false));
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// A full set of panel lines sharing one trace
pub fn trace_pins() -> (PanelPins<TracePin>, Trace) {
    let trace: Trace = Rc::new(RefCell::new(Vec::new()));
    let pin = |line| TracePin {
        line,
        trace: trace.clone(),
        high: false,
    };
    let pins = PanelPins {
        mux0: pin(Line::Mux0),
        mux1: pin(Line::Mux1),
        mux2: pin(Line::Mux2),
        enable: pin(Line::Enable),
        data_red: pin(Line::Red),
        data_green: pin(Line::Green),
        latch: pin(Line::Latch),
        shift: pin(Line::Shift),
    };
    (pins, trace)
}

/// Tick source that only records start/stop calls
#[derive(Debug, Default)]
pub struct StubTicker {
    pub period_us: Option<u32>,
    pub starts: u32,
    pub stops: u32,
}

impl TickSource for StubTicker {
    fn start(&mut self, period_us: u32) {
        self.period_us = Some(period_us);
        self.starts += 1;
    }

    fn stop(&mut self) {
        self.period_us = None;
        self.stops += 1;
    }

    fn is_running(&self) -> bool {
        self.period_us.is_some()
    }
}

/// Column data shifted during a slice of the trace, as `(red, green)` per column
///
/// Reads the data levels present at each rising shift-clock edge.
pub fn shifted_columns(entries: &[(Line, bool)]) -> Vec<(bool, bool)> {
    let mut red = false;
    let mut green = false;
    let mut columns = Vec::new();
    for &(line, level) in entries {
        match line {
            Line::Red => red = level,
            Line::Green => green = level,
            Line::Shift if level => columns.push((red, green)),
            _ => {}
        }
    }
    columns
}
