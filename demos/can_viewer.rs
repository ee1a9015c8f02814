use canflow::{
    CanFrame, CanFrameSource, CanRawView, CanRawViewConfig, EngineConfig, EventFilter, EventKind, FilterConfig, FrameFilter,
    FrameSink, GraphEngine, NodeModel, NodeValue, SendStatus,
};
use log::{info, warn};
use std::error::Error;
use std::sync::{mpsc, Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

const FRAMES: u32 = 200;
/// Main loop iterations between diagnostic requests sent by the viewer
const REQUEST_PERIOD: u32 = 25;

/// Hands transmitted frames back to the simulated bus thread
struct LoopbackSink {
    tx: Mutex<mpsc::Sender<CanFrame>>,
}

impl FrameSink for LoopbackSink {
    fn transmit(&self, frame: CanFrame) {
        let tx = self.tx.lock().unwrap_or_else(PoisonError::into_inner);
        if tx.send(frame).is_err() {
            warn!("Bus is gone, frame not queued");
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    info!("Starting CAN viewer demo");

    let mut engine = GraphEngine::with_config(EngineConfig::new());
    let source = engine.add_node(Box::new(CanFrameSource::new()))?;
    let filter = engine.add_node(Box::new(FrameFilter::new(FilterConfig {
        id: 0x100,
        mask: 0x700,
        extended: Some(false),
    })))?;
    let view = engine.add_node(Box::new(CanRawView::with_config(CanRawViewConfig {
        caption: "Powertrain".to_string(),
        ..Default::default()
    })))?;
    engine.connect(source.output(0), filter.input(0))?;
    engine.connect(filter.output(0), view.input(0))?;

    let (outbound_tx, outbound_rx) = mpsc::channel();
    let source_bridge = engine
        .downcast_node::<CanFrameSource>(&source)
        .ok_or("source node missing")?
        .bridge();
    let view_node = engine
        .downcast_node_mut::<CanRawView>(&view)
        .ok_or("view node missing")?;
    view_node.attach_sink(Arc::new(LoopbackSink {
        tx: Mutex::new(outbound_tx),
    }));
    let view_bridge = view_node.bridge();
    let redraw = view_node.redraw();

    view_bridge.subscribe(EventFilter::Sent, |event| {
        if event.kind == (EventKind::Sent { status: SendStatus::Failure }) {
            warn!("Send failed for {}", event.frame);
        }
    });

    let bus = thread::spawn(move || {
        for seq in 0..FRAMES {
            let id = 0x080 + (seq * 0x35) % 0x200;
            match CanFrame::received(id, &seq.to_le_bytes()) {
                Ok(frame) => {
                    source_bridge.on_frame_received(frame);
                }
                Err(e) => warn!("Skipping frame {}: {}", seq, e),
            }

            while let Ok(frame) = outbound_rx.try_recv() {
                let status = SendStatus::from(frame.id() % 7 != 0);
                view_bridge.on_frame_sent(status, frame);
            }
            thread::sleep(Duration::from_millis(5));
        }
    });

    let mut round = 0u32;
    loop {
        let finished = bus.is_finished();
        engine.process_updates()?;

        if round % REQUEST_PERIOD == 0 {
            let request = CanFrame::transmit(0x7E0 + (round / REQUEST_PERIOD) % 8, &[0x02, 0x01, 0x0C])?;
            if let Some(view_node) = engine.node_mut(&view) {
                view_node.set_in_data(Some(NodeValue::new(request)), 0);
            }
        }
        round += 1;

        if redraw.acknowledge() {
            if let Some(view_node) = engine.downcast_node::<CanRawView>(&view) {
                let snapshot = view_node.snapshot();
                info!(
                    "current={} rx={} tx={} failed={} consumed={} state={:?}",
                    snapshot.current_frame.map(|frame| frame.to_string()).unwrap_or_default(),
                    snapshot.received,
                    snapshot.sent,
                    snapshot.send_failures,
                    snapshot.consumed,
                    snapshot.validation
                );
            }
        }
        if finished {
            break;
        }
        thread::sleep(Duration::from_millis(2));
    }
    bus.join().map_err(|_| "bus thread panicked")?;

    let dropped = engine
        .downcast_node::<FrameFilter>(&filter)
        .map(FrameFilter::dropped)
        .unwrap_or_default();
    info!("Filter dropped {} of {} frames", dropped, FRAMES);

    engine.remove_node(&source)?;
    engine.remove_node(&view)?;
    info!("Demo finished with {} node(s) left", engine.node_count());
    Ok(())
}
