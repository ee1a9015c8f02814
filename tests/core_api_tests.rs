use canflow::{
    CanFrame, CanFrameSource, CanRawView, CanRawViewConfig, DataType, EventFilter, EventKind, FilterConfig, FrameFilter, FrameSink,
    GraphEngine, GraphError, NodeModel, NodeValue, PortType, SendStatus, ValidationState,
};
use std::sync::{Arc, Mutex};

/// Sink that records frames and reports each one back as sent
///
/// Reports on the caller's thread, outside any bridge callback.
struct EchoSink {
    bridge: Mutex<Option<Arc<canflow::EventBridge>>>,
    sent: Mutex<Vec<CanFrame>>,
}

impl FrameSink for EchoSink {
    fn transmit(&self, frame: CanFrame) {
        self.sent.lock().unwrap().push(frame.clone());
        if let Some(bridge) = self.bridge.lock().unwrap().as_ref() {
            let status = SendStatus::from(frame.id() != 0x666);
            bridge.on_frame_sent(status, frame);
        }
    }
}

#[test]
fn test_viewer_port_contract() {
    let view = CanRawView::new();
    assert_eq!(view.name(), "CanRawView");
    assert_eq!(view.port_count(PortType::In), 1);
    assert_eq!(view.port_count(PortType::Out), 0);
    assert_eq!(view.port_data_type(PortType::In, 0), DataType::new("canframe", "CanFrame"));
    assert!(view.out_data(0).is_none());
}

#[test]
fn test_pipeline_shows_bus_traffic_without_echo() {
    let mut engine = GraphEngine::new();
    let source = engine.add_node_by_name("CanFrameSource").unwrap();
    let filter = engine
        .add_node(Box::new(FrameFilter::new(FilterConfig::exact(0x123))))
        .unwrap();
    let view = engine
        .add_node(Box::new(CanRawView::with_config(CanRawViewConfig {
            caption: "Body".to_string(),
            forward_input: true,
        })))
        .unwrap();
    engine.connect(source.output(0), filter.input(0)).unwrap();
    engine.connect(filter.output(0), view.input(0)).unwrap();

    let sink = Arc::new(EchoSink {
        bridge: Mutex::new(None),
        sent: Mutex::new(Vec::new()),
    });
    let view_node = engine.downcast_node_mut::<CanRawView>(&view).unwrap();
    view_node.attach_sink(sink.clone());
    let (_, events) = view_node.bridge().subscribe_channel(EventFilter::All);

    let source_bridge = engine.downcast_node::<CanFrameSource>(&source).unwrap().bridge();
    source_bridge.on_frame_received(CanFrame::received(0x123, &[0xDE, 0xAD]).unwrap());
    engine.process_updates().unwrap();

    assert!(sink.sent.lock().unwrap().is_empty());
    let event = events.try_recv().unwrap();
    assert_eq!(event.kind, EventKind::Received);
    assert_eq!(event.frame.payload(), &[0xDE, 0xAD]);
    assert!(events.try_recv().is_err());

    let snapshot = engine.downcast_node::<CanRawView>(&view).unwrap().snapshot();
    assert_eq!(snapshot.consumed, 1);
    assert_eq!(snapshot.received, 1);
    assert_eq!(snapshot.sent, 0);
    assert_eq!(snapshot.last_event, Some(EventKind::Received));
    assert_eq!(engine.node(&view).unwrap().caption(), "Body");
}

#[test]
fn test_transmit_input_round_trips_through_sink() {
    let mut engine = GraphEngine::new();
    let view = engine.add_node(Box::new(CanRawView::new())).unwrap();

    let sink = Arc::new(EchoSink {
        bridge: Mutex::new(None),
        sent: Mutex::new(Vec::new()),
    });
    let view_node = engine.downcast_node_mut::<CanRawView>(&view).unwrap();
    view_node.attach_sink(sink.clone());
    let view_bridge = view_node.bridge();
    *sink.bridge.lock().unwrap() = Some(Arc::clone(&view_bridge));
    let (_, events) = view_bridge.subscribe_channel(EventFilter::All);

    let request = CanFrame::transmit(0x7DF, &[0x02, 0x01, 0x0C]).unwrap();
    engine
        .node_mut(&view)
        .unwrap()
        .set_in_data(Some(NodeValue::new(request.clone())), 0);

    assert_eq!(*sink.sent.lock().unwrap(), vec![request.clone()]);
    let event = events.try_recv().unwrap();
    assert_eq!(event.kind, EventKind::Sent { status: SendStatus::Success });
    assert_eq!(event.frame, request);

    let snapshot = engine.downcast_node::<CanRawView>(&view).unwrap().snapshot();
    assert_eq!(snapshot.sent, 1);
    assert_eq!(snapshot.received, 0);
    assert_eq!(snapshot.current_frame, Some(request));
}

#[test]
fn test_failed_send_surfaces_as_warning() {
    let mut engine = GraphEngine::new();
    let view = engine.add_node(Box::new(CanRawView::new())).unwrap();
    let bridge = engine.downcast_node::<CanRawView>(&view).unwrap().bridge();

    bridge.on_frame_sent(SendStatus::Failure, CanFrame::transmit(0x666, &[1]).unwrap());
    match engine.node(&view).unwrap().validation_state() {
        ValidationState::Warning(message) => assert!(message.contains("666")),
        other => panic!("expected warning, got {:?}", other),
    }
}

#[test]
fn test_wrong_payload_type_is_ignored() {
    let mut view = CanRawView::new();
    let j1939 = DataType::new("j1939", "J1939Message");
    view.set_in_data(Some(NodeValue::tagged(j1939, vec![0u8; 8])), 0);
    assert!(view.current_frame().is_none());
    assert!(!view.redraw().is_pending());
}

#[test]
fn test_graph_errors_are_reported() {
    let mut engine = GraphEngine::new();
    let view = engine.add_node_by_name("CanRawView").unwrap();
    let other = engine.add_node_by_name("CanRawView").unwrap();

    let err = engine.connect(view.output(0), other.input(0)).unwrap_err();
    assert!(matches!(err, GraphError::PortOutOfRange { .. }));
    assert!(err.to_string().contains("out of range"));

    assert_eq!(
        engine.add_node_by_name("CanGateway").unwrap_err(),
        GraphError::UnknownNodeType("CanGateway".to_string())
    );

    engine.remove_node(&view).unwrap();
    assert_eq!(engine.remove_node(&view), Err(GraphError::NodeNotFound(view.clone())));
}
