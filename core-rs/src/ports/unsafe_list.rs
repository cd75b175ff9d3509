/**
 * unsafe_list.rs
 * Browser-blocklisted TCP ports
 *
 * Ports that major browsers refuse to connect to (the Chromium restricted
 * port list). A resolved port must never land on one of these even when the
 * OS reports it bindable, otherwise locally served apps become unreachable
 * from the very browsers meant to open them.
 *
 * The table is fixed for the process lifetime and never mutated.
 */
use once_cell::sync::Lazy;
use std::collections::HashSet;

static UNSAFE_PORTS: Lazy<HashSet<u16>> = Lazy::new(|| {
    [
        1,     // tcpmux
        7,     // echo
        9,     // discard
        11,    // systat
        13,    // daytime
        15,    // netstat
        17,    // qotd
        19,    // chargen
        20,    // ftp data
        21,    // ftp access
        22,    // ssh
        23,    // telnet
        25,    // smtp
        37,    // time
        42,    // name
        43,    // nicname
        53,    // domain
        69,    // tftp
        77,    // priv-rjs
        79,    // finger
        87,    // ttylink
        95,    // supdup
        101,   // hostriame
        102,   // iso-tsap
        103,   // gppitnp
        104,   // acr-nema
        109,   // pop2
        110,   // pop3
        111,   // sunrpc
        113,   // auth
        115,   // sftp
        117,   // uucp-path
        119,   // nntp
        123,   // ntp
        135,   // loc-srv / epmap
        137,   // netbios
        139,   // netbios
        143,   // imap2
        161,   // snmp
        179,   // bgp
        389,   // ldap
        427,   // slp
        465,   // smtp+ssl
        512,   // print / exec
        513,   // login
        514,   // shell
        515,   // printer
        526,   // tempo
        530,   // courier
        531,   // chat
        532,   // netnews
        540,   // uucp
        548,   // afp
        554,   // rtsp
        556,   // remotefs
        563,   // nntp+ssl
        587,   // smtp submission
        601,   // syslog-conn
        636,   // ldap+ssl
        993,   // imap+ssl
        995,   // pop3+ssl
        1719,  // h323gatestat
        1720,  // h323hostcall
        1723,  // pptp
        2049,  // nfs
        3659,  // apple-sasl
        4045,  // lockd
        5060,  // sip
        5061,  // sips
        6000,  // x11
        6566,  // sane-port
        6665,  // alternate irc
        6666,  // alternate irc
        6667,  // standard irc
        6668,  // alternate irc
        6669,  // alternate irc
        6697,  // irc+tls
        10080, // amanda
    ]
    .into_iter()
    .collect()
});

/// Test if a port is on the browser blocklist
pub fn is_unsafe_port(port: u16) -> bool {
    UNSAFE_PORTS.contains(&port)
}

/// Exact complement of [`is_unsafe_port`]
pub fn is_safe_port(port: u16) -> bool {
    !is_unsafe_port(port)
}
