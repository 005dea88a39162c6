// src/tests/common.rs

//! Common data and helpers for tests.

#![allow(non_upper_case_globals)]

use crate::common::{Dialect, NodeId};
use crate::data::datetime::{ymdhms_to_datetime, NaiveDateTime, Year};
use crate::data::event::{Category, Event, RawLine};
use crate::data::rules::PatternTable;

use ::lazy_static::lazy_static;

/// Filler year of the test `PatternTable`.
pub const YEAR_TEST: Year = 2021;

lazy_static! {
    pub static ref TABLE: PatternTable = PatternTable::new(YEAR_TEST);
}

/// Shorthand for a test datetime.
pub fn dt(year: Year, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> NaiveDateTime {
    ymdhms_to_datetime(year, month, day, hour, minute, second).unwrap()
}

/// Shorthand for a `RawLine`.
pub fn raw(text: &str, dialect: Dialect, node: &str) -> RawLine {
    RawLine::new(String::from(text), dialect, NodeId::from(node))
}

/// Shorthand for an `Event` where only datetime and node matter.
pub fn event_at(timestamp: NaiveDateTime, node: &str, text: &str) -> Event {
    Event::new(
        timestamp,
        NodeId::from(node),
        Category::Fencing,
        String::from("pengine:"),
        String::from(text),
    )
}

/// Pacemaker log of node1; events at 03:10:38 (fencing, resource-action),
/// 03:10:41 (failed-operation), and the `cib_perform_op` line inheriting
/// 03:10:42 (maintenance-mode-change) from an unclassified line.
pub const PACEMAKER_LOG_NODE1: &str = "\
2021-03-26 03:10:30 node1 pacemaker-controld[1650]: notice: State transition S_IDLE -> S_POLICY_ENGINE
2021-03-26 03:10:38 node1 pengine[1649]: notice: LogNodeActions:    * Fence (reboot) node2 'peer is no longer part of the cluster'
2021-03-26 03:10:38 node1 pengine[1649]: notice: LogAction:    * Move       rsc_ip_HA1     ( node2 -> node1 )
2021-03-26 03:10:40 node1 crmd[1650]: notice: Result of start operation for rsc_ip_HA1 on node1: 0 (ok)
2021-03-26 03:10:41 node1 crmd[1650]: notice: Result of start operation for rsc_SAPHana_HA1 on node1: 1 (error)
2021-03-26 03:10:42 node1 cib[1645]: info: Diff: --- 0.120.3 2
  cib_perform_op:  +  /cib/configuration/crm_config/cluster_property_set[@id='cib-bootstrap-options']/nvpair[@id='cib-bootstrap-options-maintenance-mode']:  @value=true
";

/// Pacemaker log of node2; events at 03:10:38 (corosync-communication) and
/// 03:10:39 (migration-threshold).
pub const PACEMAKER_LOG_NODE2: &str = "\
2021-03-26 03:10:38 node2 pacemaker-fenced[2001]: notice: Operation reboot of node2 by node1 for pacemaker-controld.1650: OK
2021-03-26 03:10:38 node2 corosync[2445]:  [TOTEM ] A processor failed, forming new configuration.
2021-03-26 03:10:39 node2 pacemaker-schedulerd[2004]: warning: check_migration_threshold: Forcing rsc_ip_HA1 away from node2 after 1000000 failures (max=1000000)
";

/// System log of node2, BSD datetimes without a year; events at 03:19:33
/// (corosync-communication) and 03:19:34 (resource-agent-alert).
pub const SYSTEM_LOG_NODE2: &str = "\
Nov 25 03:19:33 node2 corosync[2445]:  [TOTEM ] A processor failed, forming new configuration.
Nov 25 03:19:34 node2 SAPHana(rsc_SAPHana_HA1)[5112]: ERROR: ACT: SAPHanaSR-hook failed
Nov 25 03:19:35 node2 systemd[1]: Started Session 5 of user root.
";

/// A `.tar.bz2` `hb_report` written by python `tarfile` and `bz2`, holding
///
/// ```text
/// hb_report-Fri-26-Mar-2021/members.txt          node1 node2
/// hb_report-Fri-26-Mar-2021/node1/pacemaker.log  HB_REPORT_TAR_BZ2_NODE1
/// hb_report-Fri-26-Mar-2021/node2/pacemaker.log  HB_REPORT_TAR_BZ2_NODE2
/// ```
pub const HB_REPORT_TAR_BZ2: &[u8] = &[
    0x42, 0x5A, 0x68, 0x39, 0x31, 0x41, 0x59, 0x26, 0x53, 0x59, 0xE3, 0x5A, 0xC7, 0xED, 0x00, 0x01,
    0x14, 0x7F, 0x94, 0xCE, 0x10, 0x00, 0x40, 0x40, 0x03, 0xFF, 0xF8, 0x19, 0x26, 0x00, 0x0A, 0xFE,
    0xEF, 0xDE, 0x40, 0x00, 0x01, 0x00, 0x10, 0xA0, 0x08, 0x30, 0x01, 0x38, 0x00, 0xC6, 0x86, 0x86,
    0x80, 0x0C, 0x86, 0x80, 0x00, 0x00, 0x00, 0x18, 0xD0, 0xD0, 0xD0, 0x01, 0x90, 0xD0, 0x00, 0x00,
    0x00, 0x01, 0x14, 0x90, 0x1A, 0x05, 0x30, 0x9E, 0xA9, 0xA6, 0xC8, 0x47, 0xA8, 0x68, 0x0D, 0x1E,
    0xD4, 0x4F, 0x53, 0xDA, 0xA6, 0x8F, 0xD4, 0x8C, 0x1D, 0x49, 0x31, 0x6C, 0x44, 0x28, 0xC5, 0x4A,
    0xA9, 0xBB, 0x7E, 0xED, 0xED, 0xC3, 0xA3, 0x4B, 0x46, 0x65, 0x85, 0xEC, 0x20, 0x90, 0x85, 0x59,
    0xC5, 0x03, 0x59, 0xF7, 0x3B, 0xCC, 0x88, 0x3B, 0xAC, 0xE2, 0x77, 0xD1, 0xC3, 0x99, 0xCC, 0xA0,
    0xC1, 0xDA, 0x7A, 0x37, 0xB8, 0xB4, 0x9E, 0xB5, 0x86, 0x1C, 0x5D, 0xA0, 0x84, 0xCF, 0x86, 0xE4,
    0x2A, 0x81, 0x84, 0xF7, 0x39, 0xBE, 0x26, 0x13, 0x2D, 0x9C, 0x5C, 0x59, 0x43, 0x99, 0x34, 0x8C,
    0xCE, 0x27, 0x86, 0x2D, 0x7E, 0x73, 0x24, 0x58, 0xD1, 0xD4, 0xC9, 0xA5, 0x38, 0x30, 0xC9, 0x21,
    0xC6, 0x0B, 0x4A, 0x49, 0x5E, 0x41, 0xB1, 0xB8, 0x36, 0x34, 0x64, 0xCA, 0x19, 0x1D, 0x8C, 0x92,
    0x9B, 0x58, 0x64, 0xC1, 0x33, 0xB4, 0xFB, 0x12, 0x2C, 0x2B, 0xF3, 0x37, 0x99, 0x3F, 0x42, 0x44,
    0x9F, 0xD9, 0x5E, 0x1E, 0x8D, 0xAF, 0xB1, 0xE0, 0x7B, 0x06, 0x4F, 0xE9, 0xD1, 0xA3, 0x99, 0x88,
    0xF0, 0x28, 0x39, 0x0D, 0x46, 0x43, 0x33, 0x42, 0xAE, 0x4F, 0xE0, 0xF5, 0x36, 0x4C, 0xC0, 0xEB,
    0xAE, 0xBB, 0x49, 0xB0, 0x41, 0x51, 0xCC, 0xD8, 0x6D, 0x22, 0x93, 0x4B, 0x8A, 0xCD, 0x84, 0x8A,
    0xFE, 0x75, 0x48, 0x89, 0x95, 0x0F, 0xF8, 0xFC, 0x9B, 0xCB, 0x87, 0xB9, 0xFE, 0x97, 0x8C, 0xCC,
    0x5C, 0x58, 0x21, 0x83, 0xA3, 0xD1, 0x98, 0x78, 0xBD, 0x1A, 0xAD, 0x6F, 0x83, 0xAB, 0x0E, 0xB0,
    0xE8, 0x52, 0xF6, 0x12, 0x77, 0x97, 0x10, 0x67, 0xAB, 0x9F, 0x24, 0x43, 0xFE, 0x2E, 0xE4, 0x8A,
    0x70, 0xA1, 0x21, 0xC6, 0xB5, 0x8F, 0xDA,
];

pub const HB_REPORT_TAR_BZ2_NODE1: &str =
    "2021-03-26 03:10:38 node1 crmd[1650]: crit: Lost connection to the CIB manager\n";

pub const HB_REPORT_TAR_BZ2_NODE2: &str =
    "2021-03-26 03:10:39 node2 crmd[2005]: crit: Lost connection to the CIB manager\n";
