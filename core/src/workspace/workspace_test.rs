#[cfg(test)]
mod tests {
    use anyhow::Result;

    use crate::registry::Registry;
    use crate::val::{Group, Value};
    use crate::workspace::Workspace;

    fn registry() -> Result<Registry> {
        let mut b = Registry::builder();
        b.variable("n", Group::Index, "")?;
        b.variable("grid", Group::Vector, "")?;
        b.variable("label", Group::String, "")?;
        b.build()
    }

    #[test]
    fn test_fresh_workspace_is_unoccupied() -> Result<()> {
        let reg = registry()?;
        let ws = Workspace::new(&reg);
        assert_eq!(ws.len(), 3);
        assert_eq!(ws.occupied_count(), 0);
        for (id, _) in reg.variables() {
            assert!(!ws.is_occupied(id));
        }
        Ok(())
    }

    #[test]
    fn test_write_then_read() -> Result<()> {
        let reg = registry()?;
        let mut ws = Workspace::new(&reg);
        let grid = reg.variable_id("grid").unwrap();
        ws.write(grid, Value::Vector(vec![1.0, 2.0]));
        assert!(ws.is_occupied(grid));
        assert_eq!(ws.read(grid), &Value::Vector(vec![1.0, 2.0]));

        ws.write(grid, Value::Vector(vec![3.0]));
        assert_eq!(ws.read(grid).as_vector()?, &[3.0]);
        assert_eq!(ws.occupied_vars().collect::<Vec<_>>(), vec![grid]);
        Ok(())
    }

    #[test]
    fn test_mark_occupied_keeps_default() -> Result<()> {
        let reg = registry()?;
        let mut ws = Workspace::new(&reg);
        let label = reg.variable_id("label").unwrap();
        ws.mark_occupied(label);
        assert!(ws.is_occupied(label));
        assert_eq!(ws.read(label), &Value::String(String::new()));
        Ok(())
    }

    #[test]
    fn test_clone_is_independent() -> Result<()> {
        let reg = registry()?;
        let n = reg.variable_id("n").unwrap();
        let mut ws = Workspace::new(&reg);
        let copy = ws.clone();
        ws.write(n, Value::Index(5));
        assert!(!copy.is_occupied(n));
        Ok(())
    }

    #[test]
    fn test_merge_from_copies_only_listed_occupied() -> Result<()> {
        let reg = registry()?;
        let n = reg.variable_id("n").unwrap();
        let grid = reg.variable_id("grid").unwrap();
        let label = reg.variable_id("label").unwrap();

        let mut outer = Workspace::new(&reg);
        outer.write(label, Value::from("outer"));

        let mut inner = outer.clone();
        inner.write(n, Value::Index(7));
        inner.write(grid, Value::Vector(vec![0.5]));

        outer.merge_from(&inner, &[n, label]);
        assert_eq!(outer.read(n).as_index()?, 7);
        assert!(!outer.is_occupied(grid));
        assert_eq!(outer.read(label).as_str()?, "outer");
        Ok(())
    }

    #[test]
    fn test_merge_never_clears() -> Result<()> {
        let reg = registry()?;
        let n = reg.variable_id("n").unwrap();
        let mut outer = Workspace::new(&reg);
        outer.write(n, Value::Index(1));
        let empty = Workspace::new(&reg);
        outer.merge_from(&empty, &[n]);
        assert!(outer.is_occupied(n));
        assert_eq!(outer.read(n).as_index()?, 1);
        Ok(())
    }
}
