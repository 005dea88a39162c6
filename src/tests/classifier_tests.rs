// src/tests/classifier_tests.rs

//! tests for `classifier.rs` and `rules.rs`

#![allow(non_snake_case)]

use crate::common::{Dialect, LogKind};
use crate::data::event::{Category, Event};
use crate::data::rules::PatternTable;
use crate::readers::classifier::{classify, classify_line, split_fields, Classification, Outcome};
use crate::tests::common::{dt, raw, TABLE};

use ::test_case::test_case;

const PM: Dialect = Dialect::Pacemaker;
const SL: Dialect = Dialect::Syslog;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// golden corpus; each line belongs to exactly the one category given
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test_case(
    "2021-03-26 03:10:38 node1 pengine: notice: LogNodeActions:    * Fence (reboot) node2 'peer is no longer part of the cluster'",
    PM, Some(Category::Fencing); "fence action")]
#[test_case(
    "2021-03-26 03:10:45 node1 pacemaker-fenced[1647]: notice: remote_op_done: Operation 'reboot' targeting node2 on node1 for pacemaker-controld.1650@node1: OK",
    PM, Some(Category::Fencing); "remote_op_done")]
#[test_case(
    "2021-03-26 03:09:50 node1 stonith-ng[1647]: warning: Timer expired for monitor of rsc_gce_stonith",
    PM, None; "timer expired without monitor first")]
#[test_case(
    "2021-03-26 03:09:50 node1 lrmd[1647]: warning: rsc_vip_monitor_10000 process (PID 4711) Timer expired",
    PM, Some(Category::Fencing); "monitor timer expired")]
#[test_case(
    "2021-03-26 03:10:38 node1 pengine[1649]: notice: LogAction:    * Move       rsc_ip_HA1     ( node2 -> node1 )",
    PM, Some(Category::ResourceAction); "LogAction")]
#[test_case(
    "2021-03-26 03:10:38 node1 pacemaker-schedulerd[1649]: notice:  * Stop       rsc_ip_HA1     (     node2 )  due to node availability (LogAction)",
    PM, Some(Category::ResourceAction); "LogAction parenthesized")]
#[test_case(
    "2021-03-26 03:10:38 node1 pengine[1649]: info: Resource rsc_ip_HA1 cannot run anywhere",
    PM, Some(Category::ResourceAction); "cannot run anywhere")]
#[test_case(
    "2021-03-26 03:10:41 node1 crmd[1650]: notice: Result of start operation for rsc_SAPHana_HA1 on node1: 1 (error)",
    PM, Some(Category::FailedOperation); "failed start")]
#[test_case(
    "2021-03-26 03:10:40 node1 crmd[1650]: notice: Result of start operation for rsc_ip_HA1 on node1: 0 (ok)",
    PM, None; "ok start")]
#[test_case(
    "2021-03-26 03:10:40 node1 crmd[1650]: notice: Result of stop operation for rsc_ip_HA1 on node1: Cancelled",
    PM, None; "cancelled")]
#[test_case(
    "2021-03-26 03:10:40 node1 crmd[1650]: notice: Result of probe operation for rsc_ip_HA1 on node1: 7 (not running)",
    PM, None; "excluded operation name")]
#[test_case(
    "2021-03-26 03:10:40 node1 crmd[1650]: notice: Result of monitor operation for rsc_tokenring on node1: 1 (error)",
    PM, None; "ok within a word")]
#[test_case(
    "2021-03-26 03:10:40 node1 crmd[1650]: notice: Result of monitor operation for rsc_hook on node1: 1 (error)",
    PM, None; "ok within a resource name")]
#[test_case(
    "2021-03-26 03:10:40 node1 crmd[1650]: notice: Result of start operation for rsc_ip_HA1 on node1: 1 (OK)",
    PM, None; "OK upper case")]
#[test_case(
    "2021-11-25 03:19:33 node2 corosync[2445]: message repeated 214 times: [   [TOTEM ] Retransmit List: 31609]",
    PM, Some(Category::CorosyncCommunication); "retransmit pacemaker")]
#[test_case(
    "2021-11-25 03:19:33 node2 corosync[2445]: message repeated 214 times: [   [TOTEM ] Retransmit List: 31609]",
    SL, Some(Category::CorosyncCommunication); "retransmit syslog")]
#[test_case(
    "Nov 25 03:19:33 node2 corosync[2445]:  [TOTEM ] A new membership (10.0.0.1:1234) was formed. Members left: 2",
    SL, Some(Category::CorosyncCommunication); "membership")]
#[test_case(
    "Nov 25 03:19:33 node2 corosync[2445]:  [TOTEM ] Initializing transport (UDP/IP Unicast).",
    SL, None; "totem alone")]
#[test_case(
    "2021-03-26 03:00:00 node1 cib[1645]: info: cib_perform_op: +  /cib/configuration/crm_config/cluster_property_set[@id='cib-bootstrap-options']/nvpair[@id='cib-bootstrap-options-maintenance-mode']:  @value=true",
    PM, Some(Category::MaintenanceModeChange); "maintenance mode")]
#[test_case(
    "2021-03-26 03:00:00 node1 cib[1645]: info: cib_perform_op: ++ /cib/configuration/nodes/node[@id='1']/instance_attributes[@id='nodes-1']:  <nvpair id='nodes-1-standby' name='standby' value='on'/>",
    PM, Some(Category::MaintenanceModeChange); "node standby")]
#[test_case(
    "2021-03-26 03:00:00 node1 cib[1645]: info: cib_perform_op: ++ /cib/configuration/resources/primitive[@id='rsc_ip_HA1']/meta_attributes[@id='rsc_ip_HA1-meta_attributes']:  <nvpair id='rsc_ip_HA1-meta_attributes-is-managed' name='is-managed' value='false'/>",
    PM, Some(Category::MaintenanceModeChange); "meta attributes")]
#[test_case(
    "Mar 26 03:10:38 node1 SAPInstance(rsc_SAP_HA1_ASCS00)[4711]: ERROR: SAP instance service msg_server is not running",
    SL, Some(Category::ResourceAgentAlert); "SAPInstance error")]
#[test_case(
    "Mar 26 03:10:38 node1 gcp-vpc-move-vip[4711]: Failed to update route",
    SL, None; "move-vip with pid misses keyword")]
#[test_case(
    "Mar 26 03:10:38 node1 gcp-vpc-move-vip: Failed to update route",
    SL, Some(Category::ResourceAgentAlert); "move-vip")]
#[test_case(
    "Mar 26 03:10:38 node1 fence_gce: Failed: Unable to obtain correct plug status or plug is not available",
    SL, Some(Category::ResourceAgentAlert); "fence_gce")]
#[test_case(
    "Nov 25 03:19:34 node2 SAPHana(rsc_SAPHana_HA1)[5112]: ERROR: ACT: SAPHanaSR-hook failed",
    SL, Some(Category::ResourceAgentAlert); "SAPHana error")]
#[test_case(
    "Nov 25 03:19:34 node2 SAPHana(rsc_SAPHana_HA1)[5112]: INFO: ACT: PRIMARY, lss=1 SFAIL",
    SL, Some(Category::ResourceAgentAlert); "SAPHana act sfail")]
#[test_case(
    "Nov 25 03:19:34 node2 SAPHana(rsc_SAPHana_HA1)[5112]: INFO: DEC: hana_ha1_site_srHook_SITE2 is empty",
    SL, None; "SAPHana info")]
#[test_case(
    "2021-03-26 03:10:38 node1 crmd[1650]: crit: Lost connection to the CIB manager",
    PM, Some(Category::HighLoadOrCritical); "crit")]
#[test_case(
    "2021-03-26 03:10:38 node1 crmd[1650]: notice: High CPU load detected: 4.020000",
    PM, Some(Category::HighLoadOrCritical); "high load")]
#[test_case(
    "2021-03-26 03:10:39 node2 pacemaker-schedulerd[2004]: warning: check_migration_threshold: Forcing rsc_ip_HA1 away from node2 after 1000000 failures (max=1000000)",
    PM, Some(Category::MigrationThreshold); "migration threshold")]
#[test_case(
    "2021-03-26 03:10:39 node2 pacemaker-attrd[2003]: notice: attrd_peer_update: Setting fail-count-rsc_ip_HA1#start_0[node2]: (unset) -> INFINITY from node1",
    PM, Some(Category::MigrationThreshold); "fail count infinity")]
#[test_case(
    "2021-03-26 03:00:00 node1 cib[1645]: info: cib_perform_op: ++ /cib/configuration/constraints:  <rsc_location id='cli-ban-rsc_ip_HA1-on-node2' rsc='rsc_ip_HA1' role='Started' node='node2' score='-INFINITY'/>",
    PM, Some(Category::LocationConstraintChange); "cli-ban")]
#[test_case(
    "2021-03-26 03:00:00 node1 cib[1645]: info: cib_perform_op: -- /cib/configuration/constraints/rsc_location[@id='cli-prefer-rsc_ip_HA1']",
    PM, Some(Category::LocationConstraintChange); "cli-prefer")]
#[test_case(
    "2021-03-26 03:10:30 node1 pacemaker-controld[1650]: notice: State transition S_IDLE -> S_POLICY_ENGINE",
    PM, None; "no keyword")]
#[test_case(
    "Mar 26 03:10:38 node1 systemd[1]: Started Session 5 of user root.",
    SL, None; "syslog no keyword")]
#[test_case(
    "Mar 26 03:10:38 node1 crmd[1650]: crit: Lost connection to the CIB manager",
    SL, None; "pacemaker keyword in syslog")]
fn test_golden_corpus(line: &str, dialect: Dialect, expect: Option<Category>) {
    let table: &PatternTable = &TABLE;
    let event: Option<Event> = classify(table, &raw(line, dialect, "nodeX"), None);
    assert_eq!(event.map(|event| event.category()), expect, "line {:?}", line);
}

/// A line matching several categories belongs to the first by priority.
#[test]
fn test_category_priority() {
    // fencing and failed-operation
    let line = "2021-03-26 03:10:45 node1 pacemaker-fenced[1647]: notice: remote_op_done: Operation 'reboot' targeting node2 failed: Result of operation: Timer expired";
    let event = classify(&TABLE, &raw(line, PM, "node1"), None).unwrap();
    assert_eq!(event.category(), Category::Fencing);
    // failed-operation and corosync-communication
    let line = "2021-03-26 03:10:45 node1 crmd[1650]: error: Result of start operation for rsc_totem on node1: failed";
    let event = classify(&TABLE, &raw(line, PM, "node1"), None).unwrap();
    assert_eq!(event.category(), Category::FailedOperation);
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// event fields
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn test_classify_fence_fields() {
    let line = "2021-03-26 03:10:38 node1 pengine: notice: LogNodeActions:    * Fence (reboot) node2 'peer is no longer part of the cluster'";
    let event = classify(&TABLE, &raw(line, PM, "node2"), None).unwrap();
    assert_eq!(event.category(), Category::Fencing);
    assert_eq!(event.timestamp(), &dt(2021, 3, 26, 3, 10, 38));
    assert_eq!(event.node(), "node1");
    assert_eq!(event.component(), "pengine:");
    assert_eq!(
        event.raw_text(),
        "pengine: notice: LogNodeActions:    * Fence (reboot) node2 'peer is no longer part of the cluster'"
    );
    assert_eq!(
        event.to_string(),
        "2021-03-26 03:10:38 node1 pengine: notice: LogNodeActions:    * Fence (reboot) node2 'peer is no longer part of the cluster'"
    );
}

#[test]
fn test_classify_removes_first_pid() {
    let line = "Nov 25 03:19:34 node2 SAPHana(rsc_SAPHana_HA1)[5112]: ERROR: ACT: site [2] failed";
    let event = classify(&TABLE, &raw(line, SL, "node2"), None).unwrap();
    assert_eq!(event.component(), "SAPHana(rsc_SAPHana_HA1):");
    assert_eq!(event.raw_text(), "SAPHana(rsc_SAPHana_HA1): ERROR: ACT: site [2] failed");
    assert_eq!(event.timestamp(), &dt(2021, 11, 25, 3, 19, 34));
}

#[test]
fn test_classify_crlf() {
    let line = "2021-03-26 03:10:38 node1 crmd[1650]: crit: Lost connection\r\n";
    let event = classify(&TABLE, &raw(line, PM, "node1"), None).unwrap();
    assert_eq!(event.raw_text(), "crmd: crit: Lost connection");
}

#[test]
fn test_classify_hb_report_and_sosreport_dialects() {
    let line = "2021-03-26 03:10:38 node1 crmd[1650]: crit: Lost connection";
    for dialect in [
        Dialect::HbReport(LogKind::Pacemaker),
        Dialect::SosReport(LogKind::Pacemaker),
    ] {
        let event = classify(&TABLE, &raw(line, dialect, "node1"), None).unwrap();
        assert_eq!(event.category(), Category::HighLoadOrCritical);
    }
    for dialect in [
        Dialect::HbReport(LogKind::Syslog),
        Dialect::SosReport(LogKind::Syslog),
    ] {
        assert_eq!(classify(&TABLE, &raw(line, dialect, "node1"), None), None);
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// datetime inheritance
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

const LINE_INHERIT: &str = "  cib_perform_op:  +  /cib/configuration/crm_config/cluster_property_set[@id='cib-bootstrap-options']/nvpair[@id='cib-bootstrap-options-maintenance-mode']:  @value=true";

#[test]
fn test_classify_inherits() {
    let last = dt(2021, 3, 26, 3, 0, 1);
    let event = classify(&TABLE, &raw(LINE_INHERIT, PM, "node2"), Some(last)).unwrap();
    assert_eq!(event.timestamp(), &last);
    assert_eq!(event.category(), Category::MaintenanceModeChange);
    // no host field, so the node of the source
    assert_eq!(event.node(), "node2");
    assert_eq!(event.component(), "");
    assert!(event.raw_text().starts_with("cib_perform_op:  +  /cib"), "{:?}", event.raw_text());
}

#[test]
fn test_classify_line_orphan() {
    let classification: Classification = classify_line(&TABLE, &raw(LINE_INHERIT, PM, "node2"), None);
    assert_eq!(classification.stamp, None);
    assert_eq!(classification.outcome, Outcome::Orphan(Category::MaintenanceModeChange));
    assert_eq!(classify(&TABLE, &raw(LINE_INHERIT, PM, "node2"), None), None);
}

#[test]
fn test_classify_line_unclassified_reports_stamp() {
    let line = "2021-03-26 03:10:42 node1 cib[1645]: info: Diff: --- 0.120.3 2";
    let classification = classify_line(&TABLE, &raw(line, PM, "node1"), None);
    assert_eq!(classification.stamp, Some(dt(2021, 3, 26, 3, 10, 42)));
    assert_eq!(classification.outcome, Outcome::Unclassified);
}

#[test]
fn test_classify_own_stamp_wins() {
    let line = "2021-03-26 03:10:38 node1 crmd[1650]: crit: Lost connection";
    let event = classify(&TABLE, &raw(line, PM, "node1"), Some(dt(2020, 1, 1, 0, 0, 0))).unwrap();
    assert_eq!(event.timestamp(), &dt(2021, 3, 26, 3, 10, 38));
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test_case("2021-03-26 03:10:38 node1 crmd: crit: x", "node1", "crmd:", "crit: x"; "all fields")]
#[test_case("2021-03-26 03:10:38   node1   crmd:   crit:  x", "node1", "crmd:", "crit:  x"; "runs of spaces")]
#[test_case("2021-03-26 03:10:38 node1", "node1", "", ""; "host only")]
#[test_case("no datetime here", "", "", "no datetime here"; "no datetime")]
fn test_split_fields(text: &str, host: &str, component: &str, payload: &str) {
    let rules = TABLE.rules_for(PM);
    let fields = split_fields(&rules, text);
    assert_eq!(fields.host, host);
    assert_eq!(fields.component, component);
    assert_eq!(fields.payload, payload);
}
