//! Test fixtures for export parser testing
//!
//! Sample export content mirroring the shapes real Niagara controllers
//! emit, shared across the parser test modules.


use crate::app::services::export_parser::ExportParser;
use crate::config::PipelineConfig;

/// Parser with default configuration
pub fn default_parser() -> ExportParser {
    ExportParser::new(PipelineConfig::default())
}

/// A small N2 device export
pub fn sample_n2_export() -> &'static str {
    "\
Name,Status,Address,Controller Type
VMA-101,{ok},1,VMA14
VMA-102,\"{down,alarm}\",2,VMA14
DX-201,{ok},3,DX9100
"
}

/// A station resource export with the common metric shapes
pub fn sample_resource_export() -> &'static str {
    "\
Name,Value
cpu.usage,5%
heap.used,106 MB
heap.max,247 MB
mem.used,1024 KB
capacity.points,84 (Limit: 101)
capacity.devices,3 (Limit: 10)
globalCapacity.licensed,21.5 kRU
time.uptime,\"22 days, 7 hours\"
engine.scan.recent,102
version.niagara,4.10.0.154
"
}

/// A NiagaraNetwork station export with credential columns
pub fn sample_network_export() -> &'static str {
    "\
Path,Name,Type,Address,Host Model,Version,Status,Client Conn,Server Conn,Platform User,Platform Password
/Drivers/NiagaraNetwork/Supervisor,Supervisor,Niagara Station,ip:192.168.1.10,Workstation,4.10.0.154,{ok},Connected,Connected,admin,hunter2
/Drivers/NiagaraNetwork/SH_East,SH_East,Niagara Station,\"ip:192.168.1.140,foxs:4911\",TITAN,4.10.0.154,{down},Not connected,Not connected,admin,hunter2
/Drivers/NiagaraNetwork/SH_West,SH_West,Niagara Station,ip:192.168.1.141,TITAN,4.10.0.154,{ok},Connected,Connected,admin,hunter2
"
}

/// A BACnet device export
pub fn sample_bacnet_export() -> &'static str {
    "\
Name,Type,Device ID,Status,Netwk,MAC Addr,Vendor,Model,Firmware Rev,Health
AHU-1,Device,device:1201,{ok},1,12,JCI,MS-NAE5510,1.2.3,Ok [15-Mar-24 2:30 PM]
VAV-12,Device,device:1202,{down},1,14,JCI,MS-VMA1620,1.2.3,Fail [15-Mar-24 2:31 PM]
"
}

/// A free-text platform details report
pub fn sample_platform_report() -> &'static str {
    "\
Niagara Platform Summary
Daemon Version: 4.10.0.154
Host Model: TITAN
Model: JACE-8000
Architecture: armv7
Number of CPUs: 1
Operating System: QNX 7.0
Java Virtual Machine: OpenJDK 8
Physical RAM Free: 512 MB
Physical RAM Total: 1024 MB

Modules
alarm (Tridium 4.10.0.154)
bacnet (Tridium 4.10.0.154)
n2 (JohnsonControls 4.10.0.154)

Applications
station SH_East autostart=true status=Running

Licenses
Tridium.license (Tridium expires 2026-01-01)
"
}
