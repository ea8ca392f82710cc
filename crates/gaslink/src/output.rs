use std::io::IsTerminal;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use gaslink_frame::{frame_id_name, DecodedFrame, SessionStats, SlowDataVariant, Status, Waveform};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct FrameOutput<'a> {
    frame_id: u8,
    frame_name: &'static str,
    flags: Vec<&'static str>,
    status: &'a Status,
    waveform: &'a Waveform,
    slow: &'a SlowDataVariant,
    timestamp: String,
}

pub fn print_frame(frame: &DecodedFrame, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = FrameOutput {
                frame_id: frame.frame_id,
                frame_name: frame_id_name(frame.frame_id),
                flags: frame.status.active_flags(),
                status: &frame.status,
                waveform: &frame.waveform,
                slow: &frame.slow,
                timestamp: now_unix_millis(),
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["FIELD", "VALUE"]);
            for (field, value) in frame_rows(frame) {
                table.add_row(vec![field.to_string(), value]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            let fields = frame_rows(frame)
                .into_iter()
                .skip(1)
                .map(|(field, value)| format!("{field}={value}"))
                .collect::<Vec<_>>()
                .join(" ");
            println!(
                "frame={} ({}) {fields}",
                frame.frame_id,
                frame_id_name(frame.frame_id)
            );
        }
    }
}

#[derive(Serialize)]
struct SummaryOutput<'a> {
    summary: &'a SessionStats,
}

pub fn print_stats(stats: &SessionStats, format: OutputFormat) {
    let rows = [
        ("frames_decoded", stats.frames_decoded),
        ("checksum_failures", stats.checksum_failures),
        ("invalid_frames", stats.invalid_frames),
        ("hook_failures", stats.hook_failures),
        ("garbage_bytes", stats.garbage_bytes),
        ("overflow_resets", stats.overflow_resets),
    ];

    match format {
        OutputFormat::Json => print_json(&SummaryOutput { summary: stats }),
        OutputFormat::Table => {
            let mut table = new_table(vec!["COUNTER", "VALUE"]);
            for (name, value) in rows {
                table.add_row(vec![name.to_string(), value.to_string()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            let line = rows
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join(" ");
            println!("summary {line}");
        }
    }
}

/// Result of the `checksum` command.
#[derive(Serialize)]
pub struct ChecksumReport {
    pub length: usize,
    pub checksum: String,
    /// Present only when a full frame with a checksum byte was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
}

pub fn print_checksum(report: &ChecksumReport, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Table => {
            let mut table = new_table(vec!["FIELD", "VALUE"]);
            table.add_row(vec!["length".to_string(), report.length.to_string()]);
            table.add_row(vec!["checksum".to_string(), report.checksum.clone()]);
            if let Some(actual) = &report.actual {
                table.add_row(vec!["actual".to_string(), actual.clone()]);
            }
            if let Some(valid) = report.valid {
                table.add_row(vec!["valid".to_string(), valid.to_string()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => match (&report.actual, report.valid) {
            (Some(actual), Some(valid)) => println!(
                "checksum={} actual={actual} valid={valid}",
                report.checksum
            ),
            _ => println!("checksum={}", report.checksum),
        },
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

/// Field/value pairs for one frame, in display order.
fn frame_rows(frame: &DecodedFrame) -> Vec<(&'static str, String)> {
    let flags = frame.status.active_flags();
    let mut rows = vec![
        (
            "frame",
            format!("{} ({})", frame.frame_id, frame_id_name(frame.frame_id)),
        ),
        ("status", flag_text(&flags)),
        ("co2", percent(frame.waveform.co2)),
        ("n2o", percent(frame.waveform.n2o)),
        ("aa1", percent(frame.waveform.aa1)),
        ("aa2", percent(frame.waveform.aa2)),
        ("o2", percent(frame.waveform.o2)),
    ];
    rows.extend(slow_rows(&frame.slow));
    rows
}

const INSP_FIELDS: [&str; 5] = ["insp_co2", "insp_n2o", "insp_aa1", "insp_aa2", "insp_o2"];
const EXP_FIELDS: [&str; 5] = ["exp_co2", "exp_n2o", "exp_aa1", "exp_aa2", "exp_o2"];
const MOM_FIELDS: [&str; 5] = ["mom_co2", "mom_n2o", "mom_aa1", "mom_aa2", "mom_o2"];

fn slow_rows(slow: &SlowDataVariant) -> Vec<(&'static str, String)> {
    match slow {
        SlowDataVariant::Inspiration(gas)
        | SlowDataVariant::Expiration(gas)
        | SlowDataVariant::Momentary(gas) => {
            let fields = match slow {
                SlowDataVariant::Inspiration(_) => INSP_FIELDS,
                SlowDataVariant::Expiration(_) => EXP_FIELDS,
                _ => MOM_FIELDS,
            };
            fields
                .into_iter()
                .zip([gas.co2, gas.n2o, gas.aa1, gas.aa2, gas.o2])
                .map(|(field, value)| (field, percent(value)))
                .collect()
        }
        SlowDataVariant::General(general) => vec![
            ("resp_rate", optional(general.resp_rate)),
            ("time_since_breath", optional(general.time_since_breath)),
            ("primary_agent", general.primary_agent.name().to_string()),
            ("secondary_agent", general.secondary_agent.name().to_string()),
            (
                "atm_pressure",
                general
                    .atm_pressure
                    .map(|kpa| format!("{kpa:.1} kPa"))
                    .unwrap_or_else(no_data),
            ),
        ],
        SlowDataVariant::SensorRegisters(regs) => vec![
            ("mode", regs.mode.name().to_string()),
            (
                "errors",
                flag_text(&labels(&[
                    (regs.error.sw_error, "SW_ERROR"),
                    (regs.error.hw_error, "HW_ERROR"),
                    (regs.error.motor_fail, "MOTOR_FAIL"),
                    (regs.error.uncalibrated, "UNCALIBRATED"),
                ])),
            ),
            (
                "adapter",
                flag_text(&labels(&[
                    (regs.adapter.replace_adapter, "REPLACE_ADAPTER"),
                    (regs.adapter.no_adapter, "NO_ADAPTER"),
                    (regs.adapter.o2_clogged, "O2_CLOGGED"),
                ])),
            ),
            (
                "data_valid",
                flag_text(&labels(&[
                    (regs.data_valid.co2_out_of_range, "CO2_OOR"),
                    (regs.data_valid.n2o_out_of_range, "N2O_OOR"),
                    (regs.data_valid.agent_out_of_range, "AGENT_OOR"),
                    (regs.data_valid.o2_out_of_range, "O2_OOR"),
                    (regs.data_valid.temp_out_of_range, "TEMP_OOR"),
                    (regs.data_valid.pressure_out_of_range, "PRESSURE_OOR"),
                    (regs.data_valid.zero_calibration_required, "ZERO_REQUIRED"),
                ])),
            ),
        ],
        SlowDataVariant::Config(config) => vec![
            (
                "fitted",
                flag_text(&labels(&[
                    (config.fitted.o2, "O2"),
                    (config.fitted.co2, "CO2"),
                    (config.fitted.n2o, "N2O"),
                    (config.fitted.halothane, "HAL"),
                    (config.fitted.enflurane, "ENF"),
                    (config.fitted.isoflurane, "ISO"),
                    (config.fitted.sevoflurane, "SEV"),
                    (config.fitted.desflurane, "DES"),
                ])),
            ),
            ("hw_revision", config.hw_revision.to_string()),
            ("sw_revision", config.sw_revision.to_string()),
        ],
        SlowDataVariant::Service(service) => vec![
            ("serial_number", service.serial_number.to_string()),
            (
                "service",
                flag_text(&labels(&[
                    (service.status.zero_disabled, "ZERO_DISABLED"),
                    (service.status.zero_in_progress, "ZERO_IN_PROGRESS"),
                    (service.status.span_calibration_error, "SPAN_ERROR"),
                    (service.status.span_calibration_in_progress, "SPAN_IN_PROGRESS"),
                ])),
            ),
        ],
        SlowDataVariant::Reserved(_) => Vec::new(),
    }
}

fn labels(flags: &[(bool, &'static str)]) -> Vec<&'static str> {
    flags
        .iter()
        .filter_map(|&(set, label)| set.then_some(label))
        .collect()
}

fn flag_text(flags: &[&str]) -> String {
    if flags.is_empty() {
        "-".to_string()
    } else {
        flags.join(",")
    }
}

fn percent(value: Option<f32>) -> String {
    value
        .map(|pct| format!("{pct:.2}%"))
        .unwrap_or_else(no_data)
}

fn optional(value: Option<u8>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(no_data)
}

fn no_data() -> String {
    "--".to_string()
}

fn now_unix_millis() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis().to_string())
        .unwrap_or_else(|_| "0".to_string())
}

#[cfg(test)]
mod tests {
    use gaslink_frame::{decode_frame, encode_frame, ProtocolRevision};

    use super::*;

    const EXAMPLE: [u8; 21] = [
        0xAA, 0x55, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x06, 0x40, 0x00,
        0xFF, 0x04, 0x00, 0x03, 0xF5, 0xBC,
    ];

    #[test]
    fn general_frame_rows() {
        let frame = decode_frame(&EXAMPLE, ProtocolRevision::Standard).unwrap();
        let rows = frame_rows(&frame);

        assert_eq!(rows[0], ("frame", "3 (GENERAL)".to_string()));
        assert_eq!(rows[1], ("status", "-".to_string()));
        assert_eq!(rows[6], ("o2", "16.00%".to_string()));
        assert!(rows.contains(&("time_since_breath", "--".to_string())));
        assert!(rows.contains(&("primary_agent", "sevoflurane".to_string())));
        assert!(rows.contains(&("atm_pressure", "101.3 kPa".to_string())));
    }

    #[test]
    fn register_rows_list_raised_flags() {
        let bytes = encode_frame(
            4,
            0x03,
            [0; 5],
            [2, 0x04, 0x00, 0x41, 0, 0],
            ProtocolRevision::Standard,
        );
        let frame = decode_frame(&bytes, ProtocolRevision::Standard).unwrap();
        let rows = frame_rows(&frame);

        assert_eq!(rows[1], ("status", "BREATH,APNEA".to_string()));
        assert!(rows.contains(&("mode", "measurement".to_string())));
        assert!(rows.contains(&("errors", "MOTOR_FAIL".to_string())));
        assert!(rows.contains(&("adapter", "-".to_string())));
        assert!(rows.contains(&("data_valid", "CO2_OOR,ZERO_REQUIRED".to_string())));
    }

    #[test]
    fn reserved_frames_have_only_fast_rows() {
        let bytes = encode_frame(8, 0, [0xFFFF; 5], [0; 6], ProtocolRevision::Standard);
        let frame = decode_frame(&bytes, ProtocolRevision::Standard).unwrap();
        let rows = frame_rows(&frame);
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[2], ("co2", "--".to_string()));
    }

    #[test]
    fn frame_json_is_tagged_by_sub_message() {
        let frame = decode_frame(&EXAMPLE, ProtocolRevision::Standard).unwrap();
        let value = serde_json::to_value(&frame.slow).unwrap();
        assert_eq!(value["general"]["primary_agent"], "sevoflurane");
        assert!(value["general"]["time_since_breath"].is_null());
    }
}
