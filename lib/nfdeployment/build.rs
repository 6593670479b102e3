fn main() {
    let proto_file = "./proto/nfdeployment.proto";

    println!("building proto {}", proto_file);

    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile(&[proto_file], &["./proto"])
        .unwrap_or_else(|e| panic!("protobuf compile error: {}", e));

    println!("cargo:rerun-if-changed={}", proto_file);
}
