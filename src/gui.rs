/// interactive window with the mixture isotherms
pub mod iast_plot;
