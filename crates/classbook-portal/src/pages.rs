//! Server-rendered pages: one layout, four views.

use chrono::{Datelike as _, NaiveDate};
use classbook_core::{
  attendance::{AttendanceStatus, DATE_FORMAT},
  report::{Health, StudentReport},
  student::Student,
};
use strum::{AsRefStr, Display, EnumString};

use crate::{flash::Flash, html::HtmlWriter};

const TITLE: &str = "Classbook Student Portal";

const STYLE: &str = "
:root{--bg:#0b0f1a;--muted:#94a3b8;--text:#e5e7eb;--accent:#7c3aed;--accent2:#06b6d4;--glass:rgba(255,255,255,.06)}
*{box-sizing:border-box}
body{margin:0;background:var(--bg);color:var(--text);font-family:system-ui,sans-serif}
a{color:inherit}
.container{max-width:1100px;margin:40px auto;padding:0 16px}
.shell{border:1px solid rgba(255,255,255,.12);border-radius:22px;overflow:hidden}
.header{display:flex;gap:14px;align-items:center;padding:22px;border-bottom:1px solid rgba(255,255,255,.08)}
.logo{width:44px;height:44px;border-radius:14px;background:conic-gradient(from 210deg,var(--accent),var(--accent2),var(--accent))}
.title{font-size:20px;font-weight:700}
.tabs{display:flex;gap:8px;margin-left:auto;flex-wrap:wrap}
.tabs form{display:inline}
.tab{padding:10px 14px;border:1px solid rgba(255,255,255,.12);border-radius:12px;text-decoration:none;font-size:14px;background:var(--glass);color:var(--text);cursor:pointer}
.tab.active{background:linear-gradient(180deg,rgba(124,58,237,.22),rgba(6,182,212,.18))}
.content{padding:22px}
.grid{display:grid;gap:18px}
@media(min-width:900px){.grid-2{grid-template-columns:1fr 1fr}}
.card{background:var(--glass);border:1px solid rgba(255,255,255,.1);border-radius:18px;padding:18px}
.card h3{margin:0 0 12px;font-size:18px}
.muted{color:var(--muted);font-size:13px}
.row{display:flex;gap:12px;flex-wrap:wrap}
.row .col{flex:1 1 220px}
.input,select,.btn{width:100%;padding:12px;background:var(--glass);border:1px solid rgba(255,255,255,.16);color:var(--text);border-radius:12px;font-size:14px}
.btn{cursor:pointer;font-weight:600}
.btn.primary{background:linear-gradient(90deg,var(--accent),var(--accent2));border-color:transparent}
.table{width:100%;border-collapse:collapse;font-size:14px}
.table th,.table td{padding:12px 10px;border-bottom:1px dashed rgba(255,255,255,.08);text-align:left}
.table th{font-size:12px;text-transform:uppercase;color:var(--muted)}
.badge{padding:6px 10px;border-radius:999px;font-size:12px;border:1px solid rgba(255,255,255,.16)}
.ok{color:#22c55e}
.bad{color:#ef4444}
.flash{margin:0 22px 18px;padding:12px 14px;border-radius:12px;font-size:14px}
.flash.success{background:rgba(34,197,94,.12);border:1px solid rgba(34,197,94,.35)}
.flash.error{background:rgba(239,68,68,.12);border:1px solid rgba(239,68,68,.35)}
.searchbar{display:flex;gap:10px;flex-wrap:wrap;align-items:center;margin:8px 0 14px}
.pill{display:inline-flex;align-items:center;padding:10px 12px;background:var(--glass);border-radius:999px}
.pill input,.pill select{background:transparent;border:none;color:var(--text);width:200px}
.hint{font-size:12px;color:var(--muted);margin-top:6px}
.footer{padding:18px 22px;border-top:1px solid rgba(255,255,255,.08);font-size:12px;color:var(--muted)}
";

// ─── Views ───────────────────────────────────────────────────────────────────

/// A page reachable through `?action=`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum View {
  #[default]
  Dashboard,
  AddStudent,
  Attendance,
  Marks,
}

impl View {
  pub const ALL: [View; 4] = [Self::Dashboard, Self::AddStudent, Self::Attendance, Self::Marks];

  pub fn title(self) -> &'static str {
    match self {
      Self::Dashboard => "Dashboard",
      Self::AddStudent => "Add Student",
      Self::Attendance => "Attendance",
      Self::Marks => "Marks",
    }
  }

  pub fn href(self) -> String { format!("/?action={self}") }
}

pub struct Page<'a> {
  pub flash:   Option<&'a Flash>,
  pub today:   NaiveDate,
  pub content: Content<'a>,
}

pub enum Content<'a> {
  Dashboard {
    rows:    &'a [StudentReport],
    classes: &'a [String],
    q:       &'a str,
    class:   &'a str,
  },
  AddStudent,
  Attendance {
    students: &'a [Student],
  },
  Marks {
    students: &'a [Student],
  },
}

impl Content<'_> {
  pub fn view(&self) -> View {
    match self {
      Self::Dashboard { .. } => View::Dashboard,
      Self::AddStudent => View::AddStudent,
      Self::Attendance { .. } => View::Attendance,
      Self::Marks { .. } => View::Marks,
    }
  }
}

// ─── Layout ──────────────────────────────────────────────────────────────────

pub fn render(page: &Page<'_>) -> String {
  let mut w = HtmlWriter::new();
  w.open("html", &[("lang", "en")]);

  w.open("head", &[]);
  w.void("meta", &[("charset", "utf-8")]);
  w.void("meta", &[
    ("name", "viewport"),
    ("content", "width=device-width, initial-scale=1.0"),
  ]);
  w.element("title", &[], TITLE);
  w.open("style", &[]);
  w.raw(STYLE);
  w.close("style");
  w.close("head");

  w.open("body", &[]);
  w.open("div", &[("class", "container")]);
  w.open("div", &[("class", "shell")]);

  header(&mut w, page.content.view());

  if let Some(flash) = page.flash {
    let class = format!("flash {}", flash.kind);
    w.element("div", &[("class", class.as_str())], &flash.message);
  }

  w.open("div", &[("class", "content")]);
  match &page.content {
    Content::Dashboard { rows, classes, q, class } => dashboard(&mut w, rows, classes, q, class),
    Content::AddStudent => add_student(&mut w),
    Content::Attendance { students } => attendance(&mut w, students, page.today),
    Content::Marks { students } => marks(&mut w, students),
  }
  w.close("div");

  w.element(
    "div",
    &[("class", "footer")],
    &format!("© {} Classbook • student records portal", page.today.year()),
  );

  w.close("div");
  w.close("div");
  w.close("body");
  w.close("html");
  w.finish()
}

fn header(w: &mut HtmlWriter, active: View) {
  w.open("div", &[("class", "header")]);
  w.element("div", &[("class", "logo")], "");
  w.element("div", &[("class", "title")], TITLE);

  w.open("div", &[("class", "tabs")]);
  for view in View::ALL {
    let class = if view == active { "tab active" } else { "tab" };
    let href = view.href();
    w.element("a", &[("class", class), ("href", href.as_str())], view.title());
  }
  w.open("form", &[("method", "post"), ("action", "/")]);
  w.element(
    "button",
    &[
      ("class", "tab"),
      ("type", "submit"),
      ("name", "action"),
      ("value", "export_csv"),
    ],
    "Export CSV",
  );
  w.close("form");
  w.close("div");

  w.close("div");
}

// ─── Dashboard ───────────────────────────────────────────────────────────────

const COLUMNS: [&str; 8] = [
  "ID",
  "Name",
  "Roll",
  "Class",
  "Skills",
  "Attendance %",
  "Average Marks",
  "Health",
];

fn dashboard(w: &mut HtmlWriter, rows: &[StudentReport], classes: &[String], q: &str, class: &str) {
  w.open("div", &[("class", "card")]);
  w.element("h3", &[], "Overview");

  w.open("div", &[("class", "searchbar")]);
  w.open("form", &[("method", "get"), ("action", "/"), ("class", "row")]);
  w.void("input", &[("type", "hidden"), ("name", "action"), ("value", "dashboard")]);
  w.open("div", &[("class", "pill")]);
  w.void("input", &[
    ("type", "text"),
    ("name", "q"),
    ("placeholder", "Search by name or roll..."),
    ("value", q),
  ]);
  w.close("div");
  w.open("div", &[("class", "pill")]);
  w.open("select", &[("name", "class")]);
  w.element("option", &[("value", "")], "All Classes");
  for option in classes {
    let mut attrs = vec![("value", option.as_str())];
    if option == class {
      attrs.push(("selected", "selected"));
    }
    w.element("option", &attrs, option);
  }
  w.close("select");
  w.close("div");
  w.element("button", &[("class", "btn"), ("type", "submit")], "Apply");
  w.close("form");
  w.open("div", &[("class", "hint")]);
  w.text("Tip: Use the ");
  w.element("b", &[], "Export CSV");
  w.text(" tab to download the combined report.");
  w.close("div");
  w.close("div");

  w.open("table", &[("class", "table")]);
  w.open("tr", &[]);
  for column in COLUMNS {
    w.element("th", &[], column);
  }
  w.close("tr");

  if rows.is_empty() {
    w.open("tr", &[]);
    w.open("td", &[("colspan", "8"), ("class", "muted")]);
    if q.is_empty() && class.is_empty() {
      w.text("No students yet. Add some from the ");
      w.element("b", &[], "Add Student");
      w.text(" tab.");
    } else {
      w.text("No students match the current filters.");
    }
    w.close("td");
    w.close("tr");
  }

  for row in rows {
    let s = &row.student;
    w.open("tr", &[]);
    w.element("td", &[], &s.id.to_string());
    w.element("td", &[], &s.name);
    w.element("td", &[], &s.roll);
    w.open("td", &[]);
    w.element("span", &[("class", "badge")], &s.class);
    w.close("td");
    w.element("td", &[("class", "muted")], &s.skills);
    w.element("td", &[], &format!("{:.2}%", row.attendance_percent));
    w.element("td", &[], &format!("{:.2}", row.avg_marks));
    health_cell(w, row.health());
    w.close("tr");
  }

  w.close("table");
  w.close("div");
}

fn health_cell(w: &mut HtmlWriter, health: Health) {
  w.open("td", &[]);
  match health {
    Health::Good => {
      w.element("span", &[("class", "ok")], "●");
      w.text(" Good");
    }
    Health::Average => w.text("◐ Average"),
    Health::NeedsAttention => {
      w.element("span", &[("class", "bad")], "●");
      w.text(" Needs Attention");
    }
  }
  w.close("td");
}

// ─── Forms ───────────────────────────────────────────────────────────────────

fn add_student(w: &mut HtmlWriter) {
  w.open("div", &[("class", "grid grid-2")]);

  w.open("div", &[("class", "card")]);
  w.element("h3", &[], "Add Student");
  form_start(w, "add_student");
  w.open("div", &[("class", "row")]);
  text_field(w, "Full Name", "name", "e.g., Aditi Sharma", true);
  text_field(w, "Roll", "roll", "e.g., 23CS1042", true);
  w.close("div");
  w.open("div", &[("class", "row")]);
  text_field(w, "Class", "class", "e.g., CSE-3A", true);
  text_field(w, "Skills (comma-separated)", "skills", "Python, C++, Leadership", false);
  w.close("div");
  submit_row(w, "Save Student");
  w.close("form");
  w.element("div", &[("class", "hint")], "Note: Roll must be unique.");
  w.close("div");

  w.open("div", &[("class", "card")]);
  w.element("h3", &[], "Quick Tips");
  w.open("div", &[("class", "muted")]);
  for (lead, tab, rest) in [
    ("• After adding students, go to ", "Attendance", " tab to mark daily presence."),
    ("• Use ", "Marks", " tab to add subject-wise scores for a term (e.g., Midterm, Finals)."),
    ("• The ", "Dashboard", " shows Attendance % and Average Marks, and lets you filter by class."),
    ("• ", "Export CSV", " downloads a combined report for all students."),
  ] {
    w.open("div", &[]);
    w.text(lead);
    w.element("b", &[], tab);
    w.text(rest);
    w.close("div");
  }
  w.close("div");
  w.close("div");

  w.close("div");
}

fn attendance(w: &mut HtmlWriter, students: &[Student], today: NaiveDate) {
  let today = today.format(DATE_FORMAT).to_string();

  w.open("div", &[("class", "card")]);
  w.element("h3", &[], "Record Attendance");
  form_start(w, "add_attendance");
  w.open("div", &[("class", "row")]);
  student_select(w, students);

  w.open("div", &[("class", "col")]);
  w.element("label", &[("class", "muted")], "Date");
  w.void("input", &[
    ("class", "input"),
    ("type", "date"),
    ("name", "date"),
    ("value", today.as_str()),
    ("required", "required"),
  ]);
  w.close("div");

  w.open("div", &[("class", "col")]);
  w.element("label", &[("class", "muted")], "Status");
  w.open("select", &[("class", "input"), ("name", "status")]);
  for status in AttendanceStatus::ALL {
    w.element("option", &[("value", status.as_ref())], status.as_ref());
  }
  w.close("select");
  w.close("div");

  w.close("div");
  submit_row(w, "Save Attendance");
  w.close("form");
  w.element(
    "div",
    &[("class", "hint")],
    "Re-saving the same date will update the status (no duplicates).",
  );
  w.close("div");
}

fn marks(w: &mut HtmlWriter, students: &[Student]) {
  w.open("div", &[("class", "card")]);
  w.element("h3", &[], "Record Marks");
  form_start(w, "add_marks");
  w.open("div", &[("class", "row")]);
  student_select(w, students);
  text_field(w, "Subject", "subject", "e.g., Mathematics", true);
  w.close("div");
  w.open("div", &[("class", "row")]);
  text_field(w, "Term", "term", "e.g., Midterm 1", true);
  w.open("div", &[("class", "col")]);
  w.element("label", &[("class", "muted")], "Marks");
  w.void("input", &[
    ("class", "input"),
    ("type", "number"),
    ("step", "0.01"),
    ("min", "0"),
    ("name", "marks"),
    ("placeholder", "e.g., 78.5"),
    ("required", "required"),
  ]);
  w.close("div");
  w.close("div");
  submit_row(w, "Save Marks");
  w.close("form");
  w.close("div");
}

fn form_start(w: &mut HtmlWriter, action: &str) {
  w.open("form", &[("method", "post"), ("action", "/"), ("class", "grid")]);
  w.void("input", &[("type", "hidden"), ("name", "action"), ("value", action)]);
}

fn submit_row(w: &mut HtmlWriter, label: &str) {
  w.open("div", &[("class", "row")]);
  w.open("div", &[("class", "col")]);
  w.element("button", &[("class", "btn primary"), ("type", "submit")], label);
  w.close("div");
  w.close("div");
}

fn text_field(w: &mut HtmlWriter, label: &str, name: &str, placeholder: &str, required: bool) {
  let mut attrs = vec![
    ("class", "input"),
    ("type", "text"),
    ("name", name),
    ("placeholder", placeholder),
  ];
  if required {
    attrs.push(("required", "required"));
  }
  w.open("div", &[("class", "col")]);
  w.element("label", &[("class", "muted")], label);
  w.void("input", &attrs);
  w.close("div");
}

fn student_select(w: &mut HtmlWriter, students: &[Student]) {
  w.open("div", &[("class", "col")]);
  w.element("label", &[("class", "muted")], "Student");
  w.open("select", &[
    ("class", "input"),
    ("name", "student_id"),
    ("required", "required"),
  ]);
  w.element("option", &[("value", "")], "Select Student");
  for s in students {
    let id = s.id.to_string();
    w.element("option", &[("value", id.as_str())], &s.label());
  }
  w.close("select");
  w.close("div");
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};
  use classbook_core::{
    marks::Marks,
    report::{AttendanceTally, MarkTally},
  };

  use super::*;

  fn today() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 9, 2).unwrap() }

  fn student(id: i64, name: &str) -> Student {
    Student {
      id,
      name: name.into(),
      roll: format!("23CS10{id:02}"),
      class: "CSE-3A".into(),
      skills: String::new(),
      created_at: Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap(),
    }
  }

  fn page(content: Content<'_>) -> String {
    render(&Page { flash: None, today: today(), content })
  }

  #[test]
  fn view_names_round_trip_through_action() {
    for view in View::ALL {
      assert_eq!(view.to_string().parse::<View>().unwrap(), view);
    }
    assert_eq!(View::AddStudent.href(), "/?action=add_student");
    assert!("export_csv".parse::<View>().is_err());
  }

  #[test]
  fn active_tab_is_marked() {
    let html = page(Content::Marks { students: &[] });
    assert!(html.contains("<a class=\"tab active\" href=\"/?action=marks\">Marks</a>"), "{html}");
    assert!(html.contains("<a class=\"tab\" href=\"/?action=dashboard\">Dashboard</a>"));
  }

  #[test]
  fn flash_banner_uses_kind_as_class() {
    let flash = Flash::error("Please fill all fields.");
    let html = render(&Page {
      flash:   Some(&flash),
      today:   today(),
      content: Content::AddStudent,
    });
    assert!(html.contains("<div class=\"flash error\">Please fill all fields.</div>"), "{html}");
  }

  #[test]
  fn dashboard_rows_show_two_decimals_and_health() {
    let rows = [StudentReport::new(
      student(1, "Ananya Rao"),
      AttendanceTally { present: 3, total: 4 },
      [7000, 8000, 9000].into_iter().map(Marks).collect::<MarkTally>(),
    )];
    let html = page(Content::Dashboard {
      rows:    &rows,
      classes: &["CSE-3A".to_string()],
      q:       "",
      class:   "CSE-3A",
    });
    assert!(html.contains("<td>75.00%</td>"), "{html}");
    assert!(html.contains("<td>80.00</td>"));
    assert!(html.contains(" Good"));
    assert!(html.contains("<option value=\"CSE-3A\" selected=\"selected\">CSE-3A</option>"));
  }

  #[test]
  fn empty_dashboard_distinguishes_filters() {
    let empty = page(Content::Dashboard { rows: &[], classes: &[], q: "", class: "" });
    assert!(empty.contains("No students yet."));

    let filtered = page(Content::Dashboard { rows: &[], classes: &[], q: "zzz", class: "" });
    assert!(filtered.contains("No students match the current filters."));
    assert!(filtered.contains("value=\"zzz\""));
  }

  #[test]
  fn attendance_form_defaults_to_today_and_labels_students() {
    let students = [student(7, "Bikram Thapa")];
    let html = page(Content::Attendance { students: &students });
    assert!(html.contains("value=\"2024-09-02\""), "{html}");
    assert!(html.contains("<option value=\"7\">Bikram Thapa — 23CS1007 (CSE-3A)</option>"));
    assert!(html.contains("<option value=\"Present\">Present</option>"));
  }

  #[test]
  fn footer_carries_year() {
    assert!(page(Content::AddStudent).contains("© 2024 Classbook"));
  }
}
