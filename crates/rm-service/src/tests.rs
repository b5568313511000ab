//! Unit tests for rm-service.

#[cfg(test)]
mod helpers {
    use rm_core::{MapConfig, NodeId};

    use crate::{MapService, MapServiceBuilder};

    /// ```text
    ///            5  Peet's Coffee
    ///            │
    ///            4            Telegraph Avenue runs 2 → 4 → 5
    ///            │
    ///   1 ────── 2 ────── 3   Dwight Way, 3 = Berkeley Bowl
    ///
    ///   20 ── 21              "Island Road", unreachable from the rest
    /// ```
    ///
    /// Nodes 9 ("Top Dog") and 6 ("Peets Coffee") are named but never on a
    /// way, so they are pruned from the graph.
    pub fn populate(b: &mut MapServiceBuilder) {
        b.add_node(NodeId(1), -122.26, 37.86).unwrap();
        b.add_node(NodeId(2), -122.25, 37.86).unwrap();
        b.add_node(NodeId(3), -122.24, 37.86).unwrap();
        b.add_node(NodeId(4), -122.25, 37.87).unwrap();
        b.add_node(NodeId(5), -122.25, 37.88).unwrap();
        b.add_node(NodeId(6), -122.21, 37.89).unwrap();
        b.add_node(NodeId(9), -122.2585, 37.8675).unwrap();
        b.add_node(NodeId(20), -122.22, 37.84).unwrap();
        b.add_node(NodeId(21), -122.215, 37.84).unwrap();

        b.add_way(100, Some("Dwight Way"), &[NodeId(1), NodeId(2), NodeId(3)]).unwrap();
        b.add_way(200, Some("Telegraph Avenue"), &[NodeId(2), NodeId(4), NodeId(5)]).unwrap();
        b.add_way(300, Some("Island Road"), &[NodeId(20), NodeId(21)]).unwrap();

        b.set_name(NodeId(3), "Berkeley Bowl").unwrap();
        b.set_name(NodeId(5), "Peet's Coffee").unwrap();
        b.set_name(NodeId(6), "Peets Coffee").unwrap();
        b.set_name(NodeId(9), "Top Dog").unwrap();
    }

    pub fn service_with(config: MapConfig) -> MapService {
        let mut b = MapServiceBuilder::new(config);
        populate(&mut b);
        b.build().unwrap()
    }

    pub fn service() -> MapService {
        service_with(MapConfig::default())
    }
}

// ── Build ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod build {
    use rm_core::{BoundingBox, MapConfig, NodeId};

    use super::helpers::{populate, service};
    use crate::{DijkstraRouter, MapService, MapServiceBuilder, QueryError};

    #[test]
    fn prunes_isolated_nodes() {
        let s = service();
        assert_eq!(s.graph().node_count(), 7);
        assert!(s.graph().index_of(NodeId(9)).is_none());
        assert!(s.graph().index_of(NodeId(6)).is_none());
        assert_eq!(s.graph().prune_report().nodes_removed, 2);
    }

    #[test]
    fn bad_config_is_rejected() {
        let config = MapConfig { root: BoundingBox::default(), ..MapConfig::default() };
        let mut b = MapServiceBuilder::new(config);
        populate(&mut b);
        assert!(matches!(b.build(), Err(QueryError::Config(_))));
    }

    #[test]
    fn unknown_ids_are_invalid_arguments() {
        let mut b = MapServiceBuilder::default();
        b.add_node(NodeId(1), 0.0, 0.0).unwrap();
        assert!(matches!(b.set_name(NodeId(2), "x"), Err(QueryError::InvalidArgument(_))));
        assert!(matches!(b.connect(NodeId(1), NodeId(2)), Err(QueryError::InvalidArgument(_))));
        assert!(matches!(b.add_edge(NodeId(1), NodeId(1), -3.0), Err(QueryError::InvalidArgument(_))));
    }

    #[test]
    fn non_finite_coordinates_are_invalid_arguments() {
        let mut b = MapServiceBuilder::default();
        assert!(matches!(b.add_node(NodeId(1), f64::NAN, 37.86), Err(QueryError::InvalidArgument(_))));
        assert!(matches!(
            b.add_node(NodeId(1), -122.26, f64::NEG_INFINITY),
            Err(QueryError::InvalidArgument(_))
        ));
        assert!(matches!(b.connect(NodeId(1), NodeId(1)), Err(QueryError::InvalidArgument(_))));
    }

    #[test]
    fn custom_router() {
        let mut b = MapServiceBuilder::default();
        populate(&mut b);
        let s = b.build_with(DijkstraRouter).unwrap();
        let path = s.directions_text(&[NodeId(1), NodeId(2)]).unwrap();
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn service_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MapService>();
        assert_send_sync::<MapService<DijkstraRouter>>();
    }
}

// ── Routing ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use rm_core::{GeoPoint, MapConfig, NodeId, SearchBudget};

    use super::helpers::{service, service_with};
    use crate::{MapServiceBuilder, QueryError, RouteRequest};

    fn req(a: (f64, f64), b: (f64, f64)) -> RouteRequest {
        RouteRequest::new(GeoPoint::new(a.0, a.1), GeoPoint::new(b.0, b.1))
    }

    #[test]
    fn turns_the_corner() {
        let s = service();
        let path = s.route(&req((-122.26, 37.86), (-122.25, 37.88))).unwrap();
        assert_eq!(path, vec![NodeId(1), NodeId(2), NodeId(4), NodeId(5)]);
    }

    #[test]
    fn snaps_to_nearest_nodes() {
        let s = service();
        let path = s.route(&req((-122.2612, 37.8595), (-122.2405, 37.8603))).unwrap();
        assert_eq!(path, vec![NodeId(1), NodeId(2), NodeId(3)]);
        let plan = s.plan(&req((-122.2612, 37.8595), (-122.2405, 37.8603))).unwrap();
        assert!((plan.total_miles - 2.0 * 0.54608).abs() < 1e-3);
    }

    #[test]
    fn same_node_is_one_hop() {
        let s = service();
        let path = s.route(&req((-122.25, 37.87), (-122.2501, 37.8701))).unwrap();
        assert_eq!(path, vec![NodeId(4)]);
    }

    #[test]
    fn unreachable_is_no_route() {
        let s = service();
        let err = s.route(&req((-122.26, 37.86), (-122.215, 37.84))).unwrap_err();
        assert!(matches!(
            err,
            QueryError::NoRouteFound { from: NodeId(1), to: NodeId(21) }
        ));
    }

    #[test]
    fn exhausted_budget_is_not_no_route() {
        let config = MapConfig { search_budget: SearchBudget::nodes(1), ..MapConfig::default() };
        let s = service_with(config);
        let err = s.route(&req((-122.26, 37.86), (-122.25, 37.88))).unwrap_err();
        assert!(matches!(err, QueryError::SearchAborted { .. }), "{err}");
    }

    #[test]
    fn non_finite_coordinates_are_malformed() {
        let s = service();
        let err = s.route(&req((f64::NAN, 37.86), (-122.25, 37.88))).unwrap_err();
        assert!(matches!(err, QueryError::MalformedQuery(_)));
    }

    #[test]
    fn empty_map_is_malformed() {
        let s = MapServiceBuilder::default().build().unwrap();
        let err = s.route(&req((-122.26, 37.86), (-122.25, 37.88))).unwrap_err();
        assert!(matches!(err, QueryError::MalformedQuery(_)));
    }

    #[test]
    fn batch_keeps_request_order() {
        let s = service();
        let reqs = [
            req((-122.26, 37.86), (-122.24, 37.86)),
            req((-122.26, 37.86), (-122.215, 37.84)),
            req((-122.25, 37.88), (-122.26, 37.86)),
        ];
        let results = s.route_many(&reqs);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap(), &vec![NodeId(1), NodeId(2), NodeId(3)]);
        assert!(matches!(results[1], Err(QueryError::NoRouteFound { .. })));
        assert_eq!(
            results[2].as_ref().unwrap(),
            &vec![NodeId(5), NodeId(4), NodeId(2), NodeId(1)]
        );
    }
}

// ── Directions ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod directions {
    use rm_core::NodeId;

    use super::helpers::service;
    use crate::{QueryError, TurnCategory};

    const CORNER: [NodeId; 4] = [NodeId(1), NodeId(2), NodeId(4), NodeId(5)];

    #[test]
    fn segments_by_way() {
        let s = service();
        let dirs = s.directions(&CORNER).unwrap();
        assert_eq!(dirs.len(), 2);
        assert_eq!(dirs[0].category, TurnCategory::Start);
        assert_eq!(dirs[0].way, "Dwight Way");
        assert_eq!(dirs[1].category, TurnCategory::Left);
        assert_eq!(dirs[1].way, "Telegraph Avenue");
    }

    #[test]
    fn text_form() {
        let s = service();
        assert_eq!(
            s.directions_text(&CORNER).unwrap(),
            vec![
                "Start on Dwight Way and continue for 0.546 miles.".to_string(),
                "Turn left on Telegraph Avenue and continue for 1.383 miles.".to_string(),
            ]
        );
    }

    #[test]
    fn text_parses_back() {
        let s = service();
        for line in s.directions_text(&CORNER).unwrap() {
            let parsed = s.parse_direction(&line).unwrap();
            assert_eq!(parsed.to_string(), line);
        }
        assert!(matches!(
            s.parse_direction("Turn left on Telegraph Avenue and continue for far miles."),
            Err(QueryError::InvalidArgument(_))
        ));
    }

    #[test]
    fn unknown_node_is_invalid() {
        let s = service();
        // Node 9 was pruned.
        let err = s.directions(&[NodeId(1), NodeId(9)]).unwrap_err();
        assert!(matches!(err, QueryError::InvalidArgument(_)));
        assert!(s.directions(&[]).unwrap().is_empty());
    }
}

// ── Tiles ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod raster {
    use super::helpers::service;
    use crate::RasterRequest;

    #[test]
    fn whole_root_is_depth_zero() {
        let s = service();
        let res = s.raster(&RasterRequest::new(s.config().root, 256.0, 256.0));
        assert!(res.query_success);
        assert_eq!(res.depth, 0);
        assert_eq!(res.render_grid, vec![vec!["d0_x0_y0".to_string()]]);
    }

    #[test]
    fn outside_is_unsuccessful_not_an_error() {
        let s = service();
        let req = RasterRequest { ullon: -100.0, ullat: 40.0, lrlon: -99.0, lrlat: 39.0, w: 512.0, h: 512.0 };
        let res = s.raster(&req);
        assert!(!res.query_success);
        assert!(res.render_grid.is_empty());
    }
}

// ── Autocomplete ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod autocomplete {
    use rm_core::NodeId;

    use super::helpers::service;
    use crate::QueryError;

    #[test]
    fn prefix_lookup() {
        let s = service();
        let mut hits = s.autocomplete(Some("pee")).unwrap();
        hits.sort_unstable();
        assert_eq!(hits, vec!["Peet's Coffee", "Peets Coffee"]);
        assert!(s.autocomplete(Some("xyz")).unwrap().is_empty());
        assert_eq!(s.autocomplete(Some("")).unwrap().len(), 4);
    }

    #[test]
    fn pruned_points_stay_searchable() {
        let s = service();
        assert_eq!(s.autocomplete(Some("top")).unwrap(), vec!["Top Dog"]);
        let records = s.locations(Some("top dog")).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, NodeId(9));
        assert_eq!((records[0].lon, records[0].lat), (-122.2585, 37.8675));
    }

    #[test]
    fn location_records_share_normalized_name() {
        let s = service();
        let records = s.locations(Some("Peets Coffee")).unwrap();
        let ids: Vec<NodeId> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![NodeId(5), NodeId(6)]);
        assert!(s.locations(Some("nowhere")).unwrap().is_empty());
    }

    #[test]
    fn absent_arguments_are_rejected() {
        let s = service();
        assert!(matches!(s.autocomplete(None), Err(QueryError::InvalidArgument(_))));
        assert!(matches!(s.locations(None), Err(QueryError::InvalidArgument(_))));
    }
}

// ── Wire format ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod wire {
    use serde_json::{json, Value};

    use rm_core::NodeId;

    use super::helpers::service;
    use crate::{NavigationDirection, RasterRequest, RouteRequest, TurnCategory};

    #[test]
    fn raster_field_names() {
        let s = service();
        let res = s.raster(&RasterRequest::new(s.config().root, 256.0, 256.0));
        let v = serde_json::to_value(&res).unwrap();
        for key in [
            "render_grid",
            "raster_ul_lon",
            "raster_ul_lat",
            "raster_lr_lon",
            "raster_lr_lat",
            "depth",
            "query_success",
        ] {
            assert!(v.get(key).is_some(), "missing {key}");
        }
        assert_eq!(v["render_grid"], json!([["d0_x0_y0"]]));
        assert_eq!(v["query_success"], Value::Bool(true));
    }

    #[test]
    fn raster_request_from_json() {
        let req: RasterRequest = serde_json::from_value(json!({
            "ullon": -122.30, "ullat": 37.89, "lrlon": -122.20, "lrlat": 37.80,
            "w": 512.0, "h": 300.0
        }))
        .unwrap();
        assert_eq!(req.w, 512.0);
    }

    #[test]
    fn route_request_and_response() {
        let s = service();
        let req: RouteRequest = serde_json::from_value(json!({
            "start_lon": -122.26, "start_lat": 37.86, "end_lon": -122.24, "end_lat": 37.86
        }))
        .unwrap();
        let path = s.route(&req).unwrap();
        assert_eq!(serde_json::to_value(&path).unwrap(), json!([1, 2, 3]));
    }

    #[test]
    fn location_record_keys() {
        let s = service();
        let v = serde_json::to_value(s.locations(Some("berkeley bowl")).unwrap()).unwrap();
        assert_eq!(
            v,
            json!([{ "lat": 37.86, "lon": -122.24, "name": "Berkeley Bowl", "id": 3 }])
        );
    }

    #[test]
    fn direction_struct_form_round_trips_exactly() {
        let d = NavigationDirection::new(TurnCategory::SlightLeft, "Dwight Way", 0.123_456_789);
        let v = serde_json::to_value(&d).unwrap();
        assert_eq!(v["category"], json!("slight_left"));
        let back: NavigationDirection = serde_json::from_value(v).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn node_id_is_a_bare_number() {
        assert_eq!(serde_json::to_string(&NodeId(-7)).unwrap(), "-7");
    }
}
