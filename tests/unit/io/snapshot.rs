//! Tests for map documents and text rendering

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use tilewave::algorithm::executor::{
        NeverCancel, PrePlacements, SolveOutcome, Solver, SolverConfig,
    };
    use tilewave::algorithm::recovery::{RecoveryPolicy, SolveRequest, solve_with_recovery};
    use tilewave::io::configuration::MAP_FORMAT_VERSION;
    use tilewave::io::snapshot::{MapCoord, MapDocument, render_text};
    use tilewave::model::{AdjacencyModel, RuleSet, Side, SymmetryPolicy, TileId};
    use tilewave::spatial::Coord;

    fn terrain() -> AdjacencyModel {
        let rules = RuleSet::new()
            .with_tile("grass", 1.0)
            .with_tile("water", 1.0)
            .with_self_adjacency("grass")
            .with_self_adjacency("water");
        AdjacencyModel::new(&rules, SymmetryPolicy::Derive).unwrap()
    }

    fn twisted() -> AdjacencyModel {
        let rules = RuleSet::new()
            .with_tile("t0", 1.0)
            .with_tile("t1", 1.0)
            .with_tile("t2", 1.0)
            .with_rule("t0", Side::Right, "t1", 100.0)
            .with_rule("t1", Side::Right, "t0", 100.0)
            .with_rule("t2", Side::Right, "t2", 100.0)
            .with_rule("t0", Side::Bottom, "t0", 100.0)
            .with_rule("t1", Side::Bottom, "t2", 100.0)
            .with_rule("t2", Side::Bottom, "t1", 100.0);
        AdjacencyModel::new(&rules, SymmetryPolicy::Derive).unwrap()
    }

    // Tests a fully propagated grid lists every cell with locked placements
    // Verified by marking every cell as locked
    #[test]
    fn test_from_snapshot_complete() {
        let model = terrain();
        let placements = PrePlacements::from([(Coord::new(0, 0), TileId::new(1))]);
        let solver = Solver::new(&model, 2, 2, &placements, SolverConfig::new(42)).unwrap();

        let document =
            MapDocument::from_snapshot(&solver.snapshot(), &model, &placements, Some(9), None);

        assert_eq!(document.version, MAP_FORMAT_VERSION);
        assert_eq!(document.seed, Some(9));
        assert_eq!((document.grid.width, document.grid.height), (2, 2));
        assert_eq!(document.cells.len(), 4);
        assert!(document.uncollapsed.is_empty());
        assert!(document.cells.iter().all(|cell| cell.tile_id == "water"));
        let locked: Vec<(usize, usize)> = document
            .cells
            .iter()
            .filter(|cell| cell.locked)
            .map(|cell| (cell.x, cell.y))
            .collect();
        assert_eq!(locked, vec![(0, 0)]);
    }

    // Tests undetermined cells keep their remaining tile names
    // Verified by listing open cells as assigned
    #[test]
    fn test_from_snapshot_open_cells() {
        let model = terrain();
        let solver = Solver::new(&model, 2, 1, &PrePlacements::new(), SolverConfig::new(42))
            .unwrap();

        let document = MapDocument::from_snapshot(
            &solver.snapshot(),
            &model,
            &PrePlacements::new(),
            None,
            None,
        );

        assert!(document.cells.is_empty());
        assert_eq!(document.uncollapsed.len(), 2);
        assert_eq!(document.uncollapsed[1].x, 1);
        assert_eq!(
            document.uncollapsed[0].possibilities,
            vec!["grass".to_string(), "water".to_string()]
        );
    }

    // Tests a failed solve records the contradiction cell
    // Verified by leaving the contradiction out of the document
    #[test]
    fn test_from_outcome_contradiction() {
        let model = twisted();
        let placements = PrePlacements::new();
        let request = SolveRequest {
            model: &model,
            width: 2,
            height: 2,
            placements: &placements,
            seed: 3,
        };
        let report =
            solve_with_recovery(&request, RecoveryPolicy::Report, &NeverCancel, |_| {}).unwrap();
        let SolveOutcome::Contradiction(contradiction) = &report.outcome else {
            panic!("twisted grid should not solve");
        };

        let document = MapDocument::from_outcome(&report.outcome, &model, &placements, 3);
        assert_eq!(document.seed, Some(3));
        assert_eq!(document.contradiction, Some(MapCoord::from(contradiction.cell)));
        assert!(document.cells.len() + document.uncollapsed.len() < 4);

        let text = render_text(report.outcome.snapshot(), &model);
        assert!(text.contains('!'));
    }

    // Tests saving then loading preserves the document
    // Verified by writing compact JSON without the grid
    #[test]
    fn test_save_and_load() {
        let model = terrain();
        let placements = PrePlacements::from([(Coord::new(1, 0), TileId::new(0))]);
        let solver = Solver::new(&model, 3, 2, &placements, SolverConfig::new(42)).unwrap();
        let document =
            MapDocument::from_snapshot(&solver.snapshot(), &model, &placements, Some(1), None);

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("map.json");
        document.save(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"tile_id\": \"grass\""));
        assert!(!text.contains("contradiction"));
        assert_eq!(MapDocument::load(&path).unwrap(), document);
    }

    // Tests rows are aligned and undetermined cells are marked
    // Verified by skipping the column padding
    #[test]
    fn test_render_text() {
        let model = terrain();
        let open = Solver::new(&model, 2, 1, &PrePlacements::new(), SolverConfig::new(42))
            .unwrap();
        assert_eq!(render_text(&open.snapshot(), &model), "?     ?\n");

        let placements = PrePlacements::from([(Coord::new(0, 0), TileId::new(0))]);
        let filled = Solver::new(&model, 2, 2, &placements, SolverConfig::new(42)).unwrap();
        assert_eq!(
            render_text(&filled.snapshot(), &model),
            "grass grass\ngrass grass\n"
        );
    }

    // Tests column width counts characters so accented names stay aligned
    // Verified by measuring tile names in bytes
    #[test]
    fn test_render_text_non_ascii() {
        let rules = RuleSet::new()
            .with_tile("prés", 1.0)
            .with_tile("eau", 1.0)
            .with_self_adjacency("prés")
            .with_self_adjacency("eau");
        let model = AdjacencyModel::new(&rules, SymmetryPolicy::Derive).unwrap();

        let open = Solver::new(&model, 2, 1, &PrePlacements::new(), SolverConfig::new(42))
            .unwrap();
        assert_eq!(render_text(&open.snapshot(), &model), "?    ?\n");

        let water = model.tile_id("eau").unwrap();
        let placements = PrePlacements::from([(Coord::new(0, 0), water)]);
        let filled = Solver::new(&model, 2, 1, &placements, SolverConfig::new(42)).unwrap();
        assert_eq!(render_text(&filled.snapshot(), &model), "eau  eau\n");
    }
}
