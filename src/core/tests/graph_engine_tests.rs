// Tests for GraphEngine functionality
#[cfg(test)]
mod tests {
    use super::super::init_logging;
    use crate::core::components::port_specs::PortType;
    use crate::core::components::traits::NodeModel;
    use crate::core::error::GraphError;
    use crate::core::execution::{ConcurrencyMode, EngineConfig, GraphEngine};
    use crate::core::frame::CanFrame;
    use crate::core::nodes::{CanFrameSource, CanRawView, FilterConfig, FrameFilter};
    use crate::core::values::data_type::{DataType, CAN_FRAME};
    use crate::core::values::events::EventKind;
    use crate::core::values::typed_value::NodeValue;
    use std::any::Any;

    const J1939: DataType = DataType::new("j1939", "J1939Message");

    /// Node using a data type the engine does not know by default
    struct J1939View;

    impl NodeModel for J1939View {
        fn name(&self) -> &str {
            "J1939View"
        }

        fn port_count(&self, port_type: PortType) -> usize {
            match port_type {
                PortType::In => 1,
                PortType::Out => 0,
            }
        }

        fn port_data_type(&self, _port_type: PortType, _index: usize) -> DataType {
            J1939
        }

        fn out_data(&self, _index: usize) -> Option<NodeValue> {
            None
        }

        fn set_in_data(&mut self, _value: Option<NodeValue>, _index: usize) {}

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn frame(id: u32, payload: &[u8]) -> CanFrame {
        CanFrame::received(id, payload).unwrap()
    }

    #[test]
    fn test_source_filter_view_chain() {
        init_logging();
        let mut engine = GraphEngine::new();
        let source = engine.add_node(Box::new(CanFrameSource::new())).unwrap();
        let filter = engine
            .add_node(Box::new(FrameFilter::new(FilterConfig::exact(0x123))))
            .unwrap();
        let view = engine.add_node_by_name(CanRawView::NAME).unwrap();

        engine.connect(source.output(0), filter.input(0)).unwrap();
        engine.connect(filter.output(0), view.input(0)).unwrap();

        let bridge = engine.downcast_node::<CanFrameSource>(&source).unwrap().bridge();
        bridge.on_frame_received(frame(0x200, &[0xEE]));
        assert_eq!(engine.process_updates().unwrap(), 1);

        // source update, then the filter's own update
        bridge.on_frame_received(frame(0x123, &[0x01, 0x02]));
        assert_eq!(engine.process_updates().unwrap(), 2);

        let viewer = engine.downcast_node::<CanRawView>(&view).unwrap();
        assert_eq!(viewer.current_frame(), Some(frame(0x123, &[0x01, 0x02])));
        assert_eq!(viewer.snapshot().consumed, 1);
        assert_eq!(engine.downcast_node::<FrameFilter>(&filter).unwrap().dropped(), 1);
        assert_eq!(engine.process_updates().unwrap(), 0);
    }

    #[test]
    fn test_connect_validation_errors() {
        let mut engine = GraphEngine::new();
        let source = engine.add_node_by_name(CanFrameSource::NAME).unwrap();
        let view = engine.add_node_by_name(CanRawView::NAME).unwrap();
        let other = engine.add_node_by_name(CanFrameSource::NAME).unwrap();

        assert!(matches!(
            engine.connect(view.output(0), source.input(0)),
            Err(GraphError::PortOutOfRange { .. })
        ));
        assert!(matches!(
            engine.connect(source.output(1), view.input(0)),
            Err(GraphError::PortOutOfRange { index: 1, .. })
        ));

        engine.connect(source.output(0), view.input(0)).unwrap();
        assert!(matches!(
            engine.connect(other.output(0), view.input(0)),
            Err(GraphError::InputAlreadyConnected { .. })
        ));

        engine.remove_node(&other).unwrap();
        assert_eq!(
            engine.connect(other.output(0), view.input(0)),
            Err(GraphError::NodeNotFound(other.clone()))
        );
        assert_eq!(engine.connection_stats().connected_inputs, 1);
    }

    #[test]
    fn test_unknown_data_type_requires_registration() {
        let mut engine = GraphEngine::new();
        assert_eq!(
            engine.add_node(Box::new(J1939View)),
            Err(GraphError::UnknownDataType("j1939".to_string()))
        );

        assert!(engine.register_data_type(J1939));
        let j1939 = engine.add_node(Box::new(J1939View)).unwrap();
        let source = engine.add_node_by_name(CanFrameSource::NAME).unwrap();
        assert_eq!(
            engine.connect(source.output(0), j1939.input(0)),
            Err(GraphError::DataTypeMismatch {
                source: CAN_FRAME,
                target: J1939
            })
        );
        assert!(matches!(
            engine.add_node_by_name("J1939View"),
            Err(GraphError::UnknownNodeType(_))
        ));
    }

    #[test]
    fn test_connect_delivers_current_value() {
        let mut engine = GraphEngine::new();
        let source = engine.add_node_by_name(CanFrameSource::NAME).unwrap();
        let bridge = engine.downcast_node::<CanFrameSource>(&source).unwrap().bridge();
        bridge.on_frame_received(frame(0x42, &[7]));

        let view = engine.add_node_by_name(CanRawView::NAME).unwrap();
        engine.connect(source.output(0), view.input(0)).unwrap();

        let viewer = engine.downcast_node::<CanRawView>(&view).unwrap();
        assert_eq!(viewer.current_frame().map(|f| f.id()), Some(0x42));
    }

    #[test]
    fn test_disconnect_clears_downstream() {
        let mut engine = GraphEngine::new();
        let source = engine.add_node_by_name(CanFrameSource::NAME).unwrap();
        let filter = engine.add_node_by_name(FrameFilter::NAME).unwrap();
        engine.connect(source.output(0), filter.input(0)).unwrap();

        let bridge = engine.downcast_node::<CanFrameSource>(&source).unwrap().bridge();
        bridge.on_frame_received(frame(0x1, &[]));
        engine.process_updates().unwrap();
        assert!(engine.node(&filter).unwrap().out_data(0).is_some());

        engine.disconnect(&source.output(0), &filter.input(0)).unwrap();
        assert!(engine.node(&filter).unwrap().out_data(0).is_none());
        assert_eq!(
            engine.disconnect(&source.output(0), &filter.input(0)),
            Err(GraphError::ConnectionNotFound)
        );
    }

    #[test]
    fn test_remove_node_detaches_transport() {
        init_logging();
        let mut engine = GraphEngine::new();
        let source = engine.add_node_by_name(CanFrameSource::NAME).unwrap();
        let filter = engine.add_node_by_name(FrameFilter::NAME).unwrap();
        engine.connect(source.output(0), filter.input(0)).unwrap();

        let bridge = engine.downcast_node::<CanFrameSource>(&source).unwrap().bridge();
        assert!(bridge.on_frame_received(frame(0x10, &[])));
        engine.remove_node(&source).unwrap();

        assert!(!bridge.is_attached());
        assert!(!bridge.on_frame_received(frame(0x11, &[])));
        // the update queued before removal is skipped
        assert_eq!(engine.process_updates().unwrap(), 1);
        assert!(engine.node(&filter).unwrap().out_data(0).is_none());
        assert!(!engine.has_node(&source));
        assert_eq!(engine.remove_node(&source), Err(GraphError::NodeNotFound(source.clone())));
    }

    #[test]
    fn test_rayon_fan_out() {
        let config = EngineConfig::new()
            .with_concurrency(ConcurrencyMode::Rayon)
            .with_thread_pool_size(2);
        let mut engine = GraphEngine::with_config(config);
        let source = engine.add_node_by_name(CanFrameSource::NAME).unwrap();
        let views: Vec<_> = (0..4)
            .map(|_| engine.add_node_by_name(CanRawView::NAME).unwrap())
            .collect();
        for view in &views {
            engine.connect(source.output(0), view.input(0)).unwrap();
        }

        let bridge = engine.downcast_node::<CanFrameSource>(&source).unwrap().bridge();
        bridge.on_frame_received(frame(0x7FF, &[1, 2, 3]));
        assert_eq!(engine.process_updates().unwrap(), 1);

        for view in &views {
            let viewer = engine.downcast_node::<CanRawView>(view).unwrap();
            assert_eq!(viewer.current_frame().map(|f| f.id()), Some(0x7FF));
        }
        assert_eq!(engine.propagate(&source, 0).unwrap(), 4);
    }

    #[test]
    fn test_rayon_fan_out_on_global_pool() {
        let mut engine = GraphEngine::with_config(EngineConfig::new().with_concurrency(ConcurrencyMode::Rayon));
        let source = engine.add_node_by_name(CanFrameSource::NAME).unwrap();
        let views: Vec<_> = (0..3)
            .map(|_| engine.add_node_by_name(CanRawView::NAME).unwrap())
            .collect();
        for view in &views {
            engine.connect(source.output(0), view.input(0)).unwrap();
        }

        let bridge = engine.downcast_node::<CanFrameSource>(&source).unwrap().bridge();
        bridge.on_frame_received(frame(0x321, &[4]));
        assert_eq!(engine.process_updates().unwrap(), 1);

        for view in &views {
            let snapshot = engine.downcast_node::<CanRawView>(view).unwrap().snapshot();
            assert_eq!(snapshot.consumed, 1);
            assert_eq!(snapshot.last_event, Some(EventKind::Received));
        }
    }

    #[test]
    fn test_propagation_limit() {
        let mut engine = GraphEngine::with_config(EngineConfig::new().with_max_propagation_steps(1));
        let source = engine.add_node_by_name(CanFrameSource::NAME).unwrap();
        let bridge = engine.downcast_node::<CanFrameSource>(&source).unwrap().bridge();
        bridge.on_frame_received(frame(0x1, &[]));
        bridge.on_frame_received(frame(0x2, &[]));

        assert_eq!(engine.process_updates(), Err(GraphError::PropagationLimitExceeded(1)));
        assert_eq!(engine.process_updates(), Ok(1));
    }

    #[test]
    fn test_port_contract_is_stable() {
        let mut engine = GraphEngine::new();
        let view = engine.add_node_by_name(CanRawView::NAME).unwrap();
        let ports_before = engine.node(&view).unwrap().ports();

        let node = engine.node_mut(&view).unwrap();
        for id in 0..16 {
            node.set_in_data(Some(NodeValue::new(frame(id, &[]))), 0);
        }
        engine
            .downcast_node::<CanRawView>(&view)
            .unwrap()
            .bridge()
            .on_frame_received(frame(0x3, &[]));

        let node = engine.node(&view).unwrap();
        assert_eq!(node.ports(), ports_before);
        assert_eq!(node.port_count(PortType::In), 1);
        assert_eq!(node.port_count(PortType::Out), 0);
        assert_eq!(node.port_data_type(PortType::In, 0), CAN_FRAME);
        assert_eq!(engine.node_ids().len(), 1);
    }
}
