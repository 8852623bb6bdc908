//! Arbeitsmappen-Abstraktion
//!
//! Der Orchestrator arbeitet auf einem einfachen Zellraster
//! (`get`/`set`/`row_count`) statt direkt auf der Excel-Bibliothek;
//! gelesen wird mit calamine, geschrieben mit rust_xlsxwriter.
//! Formelzellen tragen ihren berechneten Wert im Raster und die Formel
//! daneben; beim Schreiben bleibt beides erhalten. `set` auf einer
//! Formelzelle ersetzt die Formel durch den neuen Wert.

pub mod header;

use crate::error::{MatchError, Result};
use calamine::{open_workbook, Data, Reader, Xlsx};
use std::collections::HashMap;
use std::path::Path;

/// Wert einer Zelle im Raster.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// Textdarstellung für Matching und Report; `Empty` ergibt `""`.
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            CellValue::Bool(b) => b.to_string(),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl From<&Data> for CellValue {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Float(f) => CellValue::Number(*f),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
            Data::Error(_) => CellValue::Empty,
        }
    }
}

/// Ein Arbeitsblatt als Zellraster (0-basiert indiziert).
#[derive(Debug, Clone)]
pub struct SheetGrid {
    pub name: String,
    rows: Vec<Vec<CellValue>>,
    col_count: usize,
    formulas: HashMap<(usize, usize), String>,
}

impl SheetGrid {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
            col_count: 0,
            formulas: HashMap::new(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.col_count
    }

    pub fn get(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&CellValue::Empty)
    }

    /// Setzt eine Zelle und vergrößert das Raster bei Bedarf.
    /// Eine eventuell vorhandene Formel wird durch den Wert ersetzt.
    pub fn set(&mut self, row: usize, col: usize, value: CellValue) {
        self.formulas.remove(&(row, col));
        if self.rows.len() <= row {
            self.rows.resize(row + 1, Vec::new());
        }
        let cells = &mut self.rows[row];
        if cells.len() <= col {
            cells.resize(col + 1, CellValue::Empty);
        }
        cells[col] = value;
        if col + 1 > self.col_count {
            self.col_count = col + 1;
        }
    }

    /// Formel einer Zelle, gespeichert ohne führendes `=`.
    pub fn formula(&self, row: usize, col: usize) -> Option<&str> {
        self.formulas.get(&(row, col)).map(String::as_str)
    }

    /// Hinterlegt eine Formel; der Zellwert im Raster bleibt der
    /// berechnete Wert. Vergrößert das Raster bei Bedarf.
    pub fn set_formula(&mut self, row: usize, col: usize, expr: impl Into<String>) {
        let expr = expr.into();
        let expr = expr.strip_prefix('=').map(str::to_string).unwrap_or(expr);
        if self.rows.len() <= row {
            self.rows.resize(row + 1, Vec::new());
        }
        if col + 1 > self.col_count {
            self.col_count = col + 1;
        }
        self.formulas.insert((row, col), expr);
    }
}

/// Eine Arbeitsmappe als Liste von Rastern in Blattreihenfolge.
#[derive(Debug, Clone)]
pub struct WorkbookGrid {
    pub sheets: Vec<SheetGrid>,
}

impl WorkbookGrid {
    /// Liest eine XLSX-Datei ein. Führende Leerzeilen/-spalten vor dem
    /// Datenbereich bleiben als leere Zellen erhalten, damit die
    /// Zeilenindizes der Datei entsprechen.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(MatchError::FileNotFound(path.display().to_string()));
        }

        let mut workbook: Xlsx<_> = open_workbook(path)
            .map_err(|e| MatchError::ExcelRead(format!("{}: {}", path.display(), e)))?;

        let mut sheets = Vec::new();
        for (name, range) in workbook.worksheets() {
            let mut grid = SheetGrid::new(name);
            if let Some((row_offset, col_offset)) = range.start() {
                for r in 0..range.height() {
                    for c in 0..range.width() {
                        if let Some(data) = range.get((r, c)) {
                            let value = CellValue::from(data);
                            if value != CellValue::Empty {
                                grid.set(
                                    row_offset as usize + r,
                                    col_offset as usize + c,
                                    value,
                                );
                            }
                        }
                    }
                }
            }
            sheets.push(grid);
        }

        // Formeln separat einlesen; das Zellraster behält die
        // berechneten Werte aus dem Datenbereich
        for grid in &mut sheets {
            let formulas = match workbook.worksheet_formula(&grid.name) {
                Ok(range) => range,
                Err(_) => continue,
            };
            if let Some((row_offset, col_offset)) = formulas.start() {
                for r in 0..formulas.height() {
                    for c in 0..formulas.width() {
                        if let Some(expr) = formulas.get((r, c)) {
                            if !expr.is_empty() {
                                grid.set_formula(
                                    row_offset as usize + r,
                                    col_offset as usize + c,
                                    expr.clone(),
                                );
                            }
                        }
                    }
                }
            }
        }

        Ok(Self { sheets })
    }

    /// Schreibt die Mappe als neue XLSX-Datei.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut workbook = rust_xlsxwriter::Workbook::new();
        for sheet in &self.sheets {
            let worksheet = workbook.add_worksheet();
            worksheet
                .set_name(&sheet.name)
                .map_err(|e| MatchError::ExcelWrite(format!("Blattname: {}", e)))?;

            for r in 0..sheet.row_count() {
                for c in 0..sheet.col_count() {
                    let row = r as u32;
                    let col = c as u16;

                    if let Some(expr) = sheet.formula(r, c) {
                        let mut formula = rust_xlsxwriter::Formula::new(expr);
                        let cached = sheet.get(r, c);
                        if !cached.is_blank() {
                            formula = formula.set_result(cached.as_text());
                        }
                        worksheet
                            .write_formula(row, col, formula)
                            .map_err(|e| MatchError::ExcelWrite(e.to_string()))?;
                        continue;
                    }

                    match sheet.get(r, c) {
                        CellValue::Empty => {}
                        CellValue::Text(s) => {
                            worksheet
                                .write_string(row, col, s)
                                .map_err(|e| MatchError::ExcelWrite(e.to_string()))?;
                        }
                        CellValue::Number(n) => {
                            worksheet
                                .write_number(row, col, *n)
                                .map_err(|e| MatchError::ExcelWrite(e.to_string()))?;
                        }
                        CellValue::Bool(b) => {
                            worksheet
                                .write_boolean(row, col, *b)
                                .map_err(|e| MatchError::ExcelWrite(e.to_string()))?;
                        }
                    }
                }
            }
        }

        workbook
            .save(path)
            .map_err(|e| MatchError::ExcelWrite(format!("{}: {}", path.display(), e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_get_out_of_bounds_is_empty() {
        let grid = SheetGrid::new("Test");
        assert_eq!(*grid.get(5, 5), CellValue::Empty);
    }

    #[test]
    fn test_grid_set_grows() {
        let mut grid = SheetGrid::new("Test");
        grid.set(2, 3, CellValue::Text("x".into()));

        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.col_count(), 4);
        assert_eq!(grid.get(2, 3).as_text(), "x");
        assert!(grid.get(0, 0).is_blank());
    }

    #[test]
    fn test_cell_value_as_text() {
        assert_eq!(CellValue::Number(101.0).as_text(), "101");
        assert_eq!(CellValue::Number(1.5).as_text(), "1.5");
        assert_eq!(CellValue::Text("Büro".into()).as_text(), "Büro");
        assert_eq!(CellValue::Empty.as_text(), "");
    }

    #[test]
    fn test_roundtrip_through_xlsx() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.xlsx");

        let mut grid = SheetGrid::new("Blatt1");
        grid.set(0, 0, CellValue::Text("Raum-Bezeichnung".into()));
        grid.set(1, 0, CellValue::Text("Büro 101".into()));
        grid.set(1, 1, CellValue::Number(42.0));
        let workbook = WorkbookGrid { sheets: vec![grid] };
        workbook.save(&path).unwrap();

        let loaded = WorkbookGrid::load(&path).unwrap();
        assert_eq!(loaded.sheets.len(), 1);
        assert_eq!(loaded.sheets[0].name, "Blatt1");
        assert_eq!(loaded.sheets[0].get(0, 0).as_text(), "Raum-Bezeichnung");
        assert_eq!(loaded.sheets[0].get(1, 0).as_text(), "Büro 101");
        assert_eq!(loaded.sheets[0].get(1, 1).as_text(), "42");
    }

    #[test]
    fn test_formula_survives_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("formel.xlsx");

        let mut grid = SheetGrid::new("Blatt1");
        grid.set(0, 0, CellValue::Number(21.0));
        grid.set_formula(0, 1, "=A1*2");
        let workbook = WorkbookGrid { sheets: vec![grid] };
        workbook.save(&path).unwrap();

        let loaded = WorkbookGrid::load(&path).unwrap();
        assert_eq!(loaded.sheets[0].formula(0, 1), Some("A1*2"));
        assert_eq!(loaded.sheets[0].get(0, 0).as_text(), "21");
    }

    #[test]
    fn test_formula_keeps_cached_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("formel.xlsx");

        let mut grid = SheetGrid::new("Blatt1");
        grid.set(0, 1, CellValue::Number(42.0));
        grid.set_formula(0, 1, "A1*2");
        let workbook = WorkbookGrid { sheets: vec![grid] };
        workbook.save(&path).unwrap();

        // der berechnete Wert bleibt neben der Formel lesbar
        let loaded = WorkbookGrid::load(&path).unwrap();
        assert_eq!(loaded.sheets[0].get(0, 1).as_text(), "42");
        assert_eq!(loaded.sheets[0].formula(0, 1), Some("A1*2"));
    }

    #[test]
    fn test_set_replaces_formula() {
        let mut grid = SheetGrid::new("Test");
        grid.set_formula(0, 0, "=A1");
        grid.set(0, 0, CellValue::Number(7.0));

        assert_eq!(grid.formula(0, 0), None);
        assert_eq!(grid.get(0, 0).as_text(), "7");
    }

    #[test]
    fn test_load_missing_file() {
        let err = WorkbookGrid::load(Path::new("/nirgendwo/mappe.xlsx")).unwrap_err();
        assert!(matches!(err, MatchError::FileNotFound(_)));
    }
}
