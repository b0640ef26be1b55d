//! Default names, file conventions and MODFLOW unit numbers.

pub const SESSION_LABEL: &str = "testing";
pub const RUN_NAME: &str = "mfpy";
pub const EXE_NAME: &str = "mf2005";

/// Check file some packages leave behind after a load.
pub const CHECK_ARTIFACT: &str = "CHD.chk";

pub const NAME_EXTENSION: &str = "nam";
pub const HEAD_EXTENSION: &str = "hds";
pub const DRAWDOWN_EXTENSION: &str = "ddn";
pub const BUDGET_EXTENSION: &str = "cbc";
pub const LIST_EXTENSION: &str = "list";

pub const LIST_UNIT: i32 = 2;
pub const HEAD_UNIT: i32 = 51;
pub const DRAWDOWN_UNIT: i32 = 52;
pub const BUDGET_UNIT: i32 = 53;

pub const HNOFLO: f64 = -999.99;
pub const HDRY: f64 = -1e30;

/// Banner MODFLOW prints on a successful run.
pub const NORMAL_TERMINATION: &str = "normal termination";

pub fn session_label() -> String { SESSION_LABEL.to_string() }
pub fn run_name() -> String { RUN_NAME.to_string() }
pub fn exe_name() -> String { EXE_NAME.to_string() }
pub fn hnoflo() -> f64 { HNOFLO }
pub fn hdry() -> f64 { HDRY }
pub fn head_unit() -> i32 { HEAD_UNIT }
pub fn drawdown_unit() -> i32 { DRAWDOWN_UNIT }
